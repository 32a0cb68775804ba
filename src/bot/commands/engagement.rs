//! Engagement Discord commands - listing, details, scheduling and staffing.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, handlers::autocomplete, resolve_employee, today},
        core::{
            availability, client,
            dates::{DATE_FORMAT, DateRange},
            employee,
            engagement::{self, EngagementPhase, NewEngagement},
            service,
            vulnerability::{get_vulnerabilities_for_engagement, sla_info},
        },
        entities::engagement::Model as EngagementModel,
        errors::Result,
    };
    use std::fmt::Write;

    const LIST_LIMIT: usize = 15;

    /// Phases offered in `/engagements`
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum PhaseChoice {
        #[name = "Upcoming"]
        Upcoming,
        #[name = "Ongoing"]
        Ongoing,
        #[name = "Completed"]
        Completed,
    }

    impl From<PhaseChoice> for EngagementPhase {
        fn from(value: PhaseChoice) -> Self {
            match value {
                PhaseChoice::Upcoming => Self::Upcoming,
                PhaseChoice::Ongoing => Self::Ongoing,
                PhaseChoice::Completed => Self::Completed,
            }
        }
    }

    async fn find_engagement_or_reply(
        ctx: Context<'_>,
        name: &str,
    ) -> Result<Option<EngagementModel>> {
        let found = engagement::find_engagement(&ctx.data().database, name).await?;
        if found.is_none() {
            ctx.say(format!(
                "❌ Engagement '{name}' not found. Use `/engagements` to list them."
            ))
            .await?;
        }
        Ok(found)
    }

    /// Lists engagements by phase.
    #[poise::command(slash_command, prefix_command)]
    pub async fn engagements(
        ctx: Context<'_>,
        #[description = "Only this phase (defaults to ongoing and upcoming)"] phase: Option<
            PhaseChoice,
        >,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let today = today();
        let phases = phase.map_or_else(
            || vec![EngagementPhase::Ongoing, EngagementPhase::Upcoming],
            |choice| vec![EngagementPhase::from(choice)],
        );

        let mut response = String::from("🗂️ **Engagements**\n");
        for wanted in phases {
            let list = engagement::list_by_phase(db, wanted, today).await?;
            writeln!(&mut response, "\n**{}** ({})", wanted.label(), list.len())?;
            if list.is_empty() {
                writeln!(&mut response, "_None_")?;
            }
            for eng in list.iter().take(LIST_LIMIT) {
                writeln!(
                    &mut response,
                    "• {} · {} → {} · {}",
                    eng.name,
                    eng.start_date.format(DATE_FORMAT),
                    eng.end_date.format(DATE_FORMAT),
                    engagement::DaysInfo::for_engagement(eng, today).describe()
                )?;
            }
            if list.len() > LIST_LIMIT {
                writeln!(&mut response, "… and {} more", list.len() - LIST_LIMIT)?;
            }
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Shows progress, team, findings and cost of an engagement.
    #[poise::command(slash_command, prefix_command)]
    pub async fn engagement_info(
        ctx: Context<'_>,
        #[description = "Engagement"]
        #[autocomplete = "autocomplete::autocomplete_engagement"]
        name: String,
    ) -> Result<()> {
        let Some(found) = find_engagement_or_reply(ctx, &name).await? else {
            return Ok(());
        };
        let data = ctx.data();
        let db = &data.database;
        let today = today();
        let engagement_id = found.id;

        let team = engagement::get_engagement_employees(db, engagement_id).await?;
        let findings = get_vulnerabilities_for_engagement(db, engagement_id).await?;
        let summary = engagement::summarize(found, team.len(), &findings, &data.settings, today);
        let eng = &summary.engagement;

        let mut response = format!("📋 **{}**\n", eng.name);
        writeln!(
            &mut response,
            "📅 {} → {} · {} · {}",
            eng.start_date.format(DATE_FORMAT),
            eng.end_date.format(DATE_FORMAT),
            summary.phase.label(),
            summary.days.describe()
        )?;
        writeln!(&mut response, "📈 Progress: {}%", summary.progress)?;
        if summary.ending_soon {
            writeln!(&mut response, "⏳ Ending soon")?;
        }
        writeln!(
            &mut response,
            "🎯 Priority: {} ({})",
            summary.priority, summary.priority_score
        )?;
        writeln!(
            &mut response,
            "💰 Estimated cost: {}",
            summary.estimated_cost
        )?;
        if let Some(scope) = &eng.scope {
            writeln!(&mut response, "📝 Scope: {scope}")?;
        }

        writeln!(&mut response, "\n**Team** ({})", summary.team_size)?;
        if team.is_empty() {
            writeln!(&mut response, "_Nobody assigned_")?;
        }
        for member in &team {
            writeln!(&mut response, "• {}", member.full_name)?;
        }

        writeln!(
            &mut response,
            "\n**Findings** · {} open ({} critical) · risk {}",
            summary.open_vulnerabilities, summary.critical_vulnerabilities, summary.risk_score
        )?;
        for vuln in &findings {
            let sla = sla_info(vuln, today, &data.settings.sla);
            let marker = if sla.is_overdue { " ⚠️ overdue" } else { "" };
            writeln!(
                &mut response,
                "• #{} [{:?}] {} · {:?}{marker}",
                vuln.id, vuln.severity, vuln.title, vuln.status
            )?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Schedules a new engagement.
    #[poise::command(slash_command, prefix_command)]
    pub async fn create_engagement(
        ctx: Context<'_>,
        #[description = "Engagement name"] name: String,
        #[description = "Client"]
        #[autocomplete = "autocomplete::autocomplete_client"]
        client_name: String,
        #[description = "Service name or short name"] service_name: String,
        #[description = "First day (YYYY-MM-DD)"] start: String,
        #[description = "Last day (YYYY-MM-DD)"] end: String,
        #[description = "Scope"] scope: Option<String>,
    ) -> Result<()> {
        let dates = DateRange::parse(&start, &end)?;
        let data = ctx.data();
        let db = &data.database;

        let Some(client) = client::find_client(db, &client_name).await? else {
            ctx.say(format!("❌ Client '{client_name}' not found.")).await?;
            return Ok(());
        };
        let Some(service) = service::find_service(db, &service_name).await? else {
            ctx.say(format!("❌ Service '{service_name}' not found.")).await?;
            return Ok(());
        };

        let created = engagement::create_engagement(
            db,
            data.notifier.as_ref(),
            NewEngagement {
                name,
                client_id: client.id,
                service_id: service.id,
                dates,
                scope,
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Created **{}** for {} ({dates})",
            created.name, client.name
        ))
        .await?;
        Ok(())
    }

    /// Assigns an employee to an engagement.
    #[poise::command(slash_command, prefix_command)]
    pub async fn assign(
        ctx: Context<'_>,
        #[description = "Engagement"]
        #[autocomplete = "autocomplete::autocomplete_engagement"]
        engagement_name: String,
        #[description = "Employee"]
        #[autocomplete = "autocomplete::autocomplete_employee"]
        employee_name: String,
    ) -> Result<()> {
        let Some(target) = find_engagement_or_reply(ctx, &engagement_name).await? else {
            return Ok(());
        };
        let Some(emp) = resolve_employee(ctx, Some(employee_name.as_str())).await? else {
            return Ok(());
        };
        let data = ctx.data();

        let schedule = employee::load_schedule(&data.database, emp.id).await?;
        if schedule.engagements.iter().any(|eng| eng.id == target.id) {
            ctx.say(format!(
                "ℹ️ {} is already on {}",
                emp.full_name, target.name
            ))
            .await?;
            return Ok(());
        }
        let busy = availability::availability(&schedule, target.start_date, target.end_date);

        engagement::assign_employee(&data.database, data.notifier.as_ref(), target.id, emp.id)
            .await?;

        let mut response = format!("✅ Assigned **{}** to **{}**", emp.full_name, target.name);
        if busy.busy_days > 0 {
            write!(
                &mut response,
                "\n⚠️ Already committed on {} of {} days",
                busy.busy_days, busy.total_days
            )?;
        }
        ctx.say(response).await?;
        Ok(())
    }

    /// Removes an employee from an engagement.
    #[poise::command(slash_command, prefix_command)]
    pub async fn unassign(
        ctx: Context<'_>,
        #[description = "Engagement"]
        #[autocomplete = "autocomplete::autocomplete_engagement"]
        engagement_name: String,
        #[description = "Employee"]
        #[autocomplete = "autocomplete::autocomplete_employee"]
        employee_name: String,
    ) -> Result<()> {
        let Some(target) = find_engagement_or_reply(ctx, &engagement_name).await? else {
            return Ok(());
        };
        let Some(emp) = resolve_employee(ctx, Some(employee_name.as_str())).await? else {
            return Ok(());
        };
        let data = ctx.data();

        let change =
            engagement::unassign_employee(&data.database, data.notifier.as_ref(), target.id, emp.id)
                .await?;
        let message = if change.is_empty() {
            format!("ℹ️ {} was not on {}", emp.full_name, target.name)
        } else {
            format!("✅ Removed **{}** from **{}**", emp.full_name, target.name)
        };
        ctx.say(message).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
