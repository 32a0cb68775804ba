//! Finding commands: recording, fixing and SLA tracking.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, handlers::autocomplete, today},
        core::{employee, engagement, vulnerability},
        entities::vulnerability::Severity,
        errors::Result,
    };
    use std::fmt::Write;

    /// Severities offered in `/add_vulnerability`
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum SeverityChoice {
        #[name = "Critical"]
        Critical,
        #[name = "High"]
        High,
        #[name = "Medium"]
        Medium,
        #[name = "Low"]
        Low,
    }

    impl From<SeverityChoice> for Severity {
        fn from(value: SeverityChoice) -> Self {
            match value {
                SeverityChoice::Critical => Self::Critical,
                SeverityChoice::High => Self::High,
                SeverityChoice::Medium => Self::Medium,
                SeverityChoice::Low => Self::Low,
            }
        }
    }

    /// Employee id of the caller, if their Discord account is linked
    async fn caller_id(ctx: Context<'_>) -> Result<Option<i64>> {
        let caller = employee::get_employee_by_discord_id(
            &ctx.data().database,
            &ctx.author().id.to_string(),
        )
        .await?;
        Ok(caller.map(|found| found.id))
    }

    /// Records a finding on an engagement.
    #[poise::command(slash_command, prefix_command)]
    pub async fn add_vulnerability(
        ctx: Context<'_>,
        #[description = "Engagement"]
        #[autocomplete = "autocomplete::autocomplete_engagement"]
        engagement_name: String,
        #[description = "Severity"] severity: SeverityChoice,
        #[description = "Short title"] title: String,
    ) -> Result<()> {
        let data = ctx.data();
        let Some(target) = engagement::find_engagement(&data.database, &engagement_name).await?
        else {
            ctx.say(format!("❌ Engagement '{engagement_name}' not found."))
                .await?;
            return Ok(());
        };

        let severity = Severity::from(severity);
        let created_by = caller_id(ctx).await?;
        let created = vulnerability::create_vulnerability(
            &data.database,
            target.id,
            &title,
            severity,
            created_by,
        )
        .await?;

        ctx.say(format!(
            "✅ Recorded #{} [{severity:?}] {} on **{}** · SLA {} days",
            created.id,
            created.title,
            target.name,
            data.settings.sla.days_for(severity)
        ))
        .await?;
        Ok(())
    }

    /// Marks a finding fixed.
    #[poise::command(slash_command, prefix_command)]
    pub async fn fix_vulnerability(
        ctx: Context<'_>,
        #[description = "Finding number"] id: i64,
    ) -> Result<()> {
        let fixed_by = caller_id(ctx).await?;
        let fixed = vulnerability::mark_fixed(&ctx.data().database, id, fixed_by).await?;
        ctx.say(format!("✅ #{} {} marked fixed", fixed.id, fixed.title))
            .await?;
        Ok(())
    }

    /// Lists open findings past their SLA.
    #[poise::command(slash_command, prefix_command)]
    pub async fn overdue(ctx: Context<'_>) -> Result<()> {
        let data = ctx.data();
        let today = today();
        let found = vulnerability::list_overdue(&data.database, &data.settings.sla, today).await?;
        if found.is_empty() {
            ctx.say("✅ No findings are past their SLA.").await?;
            return Ok(());
        }

        let mut response = format!("⚠️ **Overdue findings** ({})\n", found.len());
        for vuln in &found {
            let info = vulnerability::sla_info(vuln, today, &data.settings.sla);
            let engagement_name = engagement::get_engagement_by_id(&data.database, vuln.engagement_id)
                .await?
                .map_or_else(|| "unknown engagement".to_string(), |eng| eng.name);
            writeln!(
                &mut response,
                "• #{} [{:?}] {} · {} · open {} days (SLA {})",
                vuln.id, vuln.severity, vuln.title, engagement_name, info.days_open, info.sla_days
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
