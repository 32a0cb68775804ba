//! Client Discord commands

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, handlers::autocomplete, today},
        core::{client, dates::DATE_FORMAT},
        errors::Result,
    };
    use std::fmt::Write;

    /// Shows activity, engagements and risk for a client.
    #[poise::command(slash_command, prefix_command)]
    pub async fn client_report(
        ctx: Context<'_>,
        #[description = "Client name or acronym"]
        #[autocomplete = "autocomplete::autocomplete_client"]
        name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let Some(found) = client::find_client(db, &name).await? else {
            ctx.say(format!("❌ Client '{name}' not found. Use `/clients` to list them."))
                .await?;
            return Ok(());
        };

        let summary = client::client_summary(db, found, today()).await?;
        let mut response = format!(
            "🏢 **{}** ({} · {})\n",
            summary.client.name, summary.client.acronym, summary.client.code
        );
        writeln!(&mut response, "📊 Activity: {}", summary.activity)?;
        writeln!(
            &mut response,
            "🗂️ Engagements: {} current, {} total",
            summary.current_engagements, summary.total_engagements
        )?;
        if let Some(last) = summary.last_engagement_end {
            writeln!(&mut response, "📅 Last engagement ends {}", last.format(DATE_FORMAT))?;
        }
        writeln!(
            &mut response,
            "🛡️ Open findings: {} ({} critical)",
            summary.open_vulnerabilities, summary.critical_vulnerabilities
        )?;
        writeln!(
            &mut response,
            "⚠️ Risk: {} ({})",
            summary.risk_level, summary.risk_score
        )?;

        ctx.say(response).await?;
        Ok(())
    }

    /// Lists every client with its activity level.
    #[poise::command(slash_command, prefix_command)]
    pub async fn clients(ctx: Context<'_>) -> Result<()> {
        let db = &ctx.data().database;
        let today = today();
        let all = client::get_all_clients(db).await?;
        if all.is_empty() {
            ctx.say("No clients yet. Add one with `/add_client`.").await?;
            return Ok(());
        }

        let mut response = format!("🏢 **Clients** ({})\n", all.len());
        for found in all {
            let engagements = client::get_client_engagements(db, found.id).await?;
            writeln!(
                &mut response,
                "• {} ({}) · {} activity",
                found.name,
                found.acronym,
                client::activity_level(&engagements, today)
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Registers a new client.
    #[poise::command(slash_command, prefix_command)]
    pub async fn add_client(
        ctx: Context<'_>,
        #[description = "Client name"] name: String,
        #[description = "Acronym"] acronym: String,
        #[description = "Client code"] code: String,
    ) -> Result<()> {
        let created = client::create_client(&ctx.data().database, &name, &acronym, &code).await?;
        ctx.say(format!(
            "✅ Added client **{}** ({})",
            created.name, created.acronym
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
