//! Employee Discord commands - status, availability, workload, leaves and team views.
//!
//! Each command resolves the employee, loads their schedule once and hands it to the
//! pure functions in [`crate::core`].

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, handlers::autocomplete, resolve_employee, today},
        core::{
            availability, dashboard,
            dates::{DATE_FORMAT, DateRange},
            employee::{self, NewEmployee},
            leave,
            status::{self, NextEvent},
            utilization,
        },
        entities::{employee::UserType, leave::LeaveType},
        errors::Result,
    };
    use chrono::Datelike;
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Leave types offered in `/leave`
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum LeaveChoice {
        #[name = "Training"]
        Training,
        #[name = "Vacation"]
        Vacation,
        #[name = "Work from home"]
        WorkFromHome,
    }

    impl From<LeaveChoice> for LeaveType {
        fn from(value: LeaveChoice) -> Self {
            match value {
                LeaveChoice::Training => Self::Training,
                LeaveChoice::Vacation => Self::Vacation,
                LeaveChoice::WorkFromHome => Self::WorkFromHome,
            }
        }
    }

    /// Shows what an employee is doing today.
    #[poise::command(slash_command, prefix_command)]
    pub async fn status(
        ctx: Context<'_>,
        #[description = "Employee (defaults to you)"]
        #[autocomplete = "autocomplete::autocomplete_employee"]
        employee: Option<String>,
    ) -> Result<()> {
        let Some(emp) = resolve_employee(ctx, employee.as_deref()).await? else {
            return Ok(());
        };
        let schedule = employee::load_schedule(&ctx.data().database, emp.id).await?;
        let current = status::current_status(&schedule, today());

        ctx.say(format!(
            "**{}**: {}",
            emp.full_name,
            status::format_status(&current)
        ))
        .await?;
        Ok(())
    }

    /// Shows an employee's next engagement or leave.
    #[poise::command(slash_command, prefix_command)]
    pub async fn next_event(
        ctx: Context<'_>,
        #[description = "Employee (defaults to you)"]
        #[autocomplete = "autocomplete::autocomplete_employee"]
        employee: Option<String>,
    ) -> Result<()> {
        let Some(emp) = resolve_employee(ctx, employee.as_deref()).await? else {
            return Ok(());
        };
        let schedule = employee::load_schedule(&ctx.data().database, emp.id).await?;
        let event = status::next_event(&schedule, today());

        let message = match (&event, event.start_date()) {
            (NextEvent::Engagement { .. }, Some(start)) => format!(
                "🔜 **{}** starts engagement **{}** on {}",
                emp.full_name,
                event.description(),
                start.format(DATE_FORMAT)
            ),
            (NextEvent::Leave { .. }, Some(start)) => format!(
                "🔜 **{}** is off from {}: {}",
                emp.full_name,
                start.format(DATE_FORMAT),
                event.description()
            ),
            _ => format!("📭 **{}** has nothing scheduled.", emp.full_name),
        };
        ctx.say(message).await?;
        Ok(())
    }

    /// Shows free and busy days of an employee in a date range.
    #[poise::command(slash_command, prefix_command)]
    pub async fn availability(
        ctx: Context<'_>,
        #[description = "Employee"]
        #[autocomplete = "autocomplete::autocomplete_employee"]
        employee: String,
        #[description = "First day (YYYY-MM-DD)"] start: String,
        #[description = "Last day (YYYY-MM-DD)"] end: String,
    ) -> Result<()> {
        let range = DateRange::parse(&start, &end)?;
        let Some(emp) = resolve_employee(ctx, Some(employee.as_str())).await? else {
            return Ok(());
        };
        let schedule = employee::load_schedule(&ctx.data().database, emp.id).await?;
        let result = availability::availability(&schedule, range.start(), range.end());

        let mut response = format!("📅 **{}** · {range}\n", emp.full_name);
        if availability::has_conflict(&schedule, range.start(), range.end()) {
            writeln!(
                &mut response,
                "⚠️ Busy on {} of {} days",
                result.busy_days, result.total_days
            )?;
        } else {
            writeln!(&mut response, "✅ Free for the whole range")?;
        }
        writeln!(
            &mut response,
            "Available days: {} ({}%)",
            result.available_days, result.percentage
        )?;

        ctx.say(response).await?;
        Ok(())
    }

    /// Lists everyone without commitments in a date range.
    #[poise::command(slash_command, prefix_command)]
    pub async fn free(
        ctx: Context<'_>,
        #[description = "First day (YYYY-MM-DD)"] start: String,
        #[description = "Last day (YYYY-MM-DD)"] end: String,
    ) -> Result<()> {
        let range = DateRange::parse(&start, &end)?;
        let available = availability::find_available_employees(&ctx.data().database, range).await?;

        if available.is_empty() {
            ctx.say(format!("😓 Nobody is free for {range}.")).await?;
            return Ok(());
        }

        let mut response = format!("✅ **Free for {range}**\n");
        for emp in &available {
            writeln!(&mut response, "• {} (`{}`)", emp.full_name, emp.username)?;
        }
        ctx.say(response).await?;
        Ok(())
    }

    /// Shows an employee's current load, upcoming work and utilization.
    #[poise::command(slash_command, prefix_command)]
    pub async fn workload(
        ctx: Context<'_>,
        #[description = "Employee (defaults to you)"]
        #[autocomplete = "autocomplete::autocomplete_employee"]
        employee: Option<String>,
    ) -> Result<()> {
        let Some(emp) = resolve_employee(ctx, employee.as_deref()).await? else {
            return Ok(());
        };
        let data = ctx.data();
        let summary =
            dashboard::employee_workload(&data.database, emp.id, &data.settings, today()).await?;

        let mut response = format!("📋 **Workload: {}**\n", summary.full_name);
        writeln!(
            &mut response,
            "Utilization (last {} days): {:.2}%",
            data.settings.utilization.window_days, summary.utilization_rate
        )?;
        writeln!(&mut response, "Engagements overall: {}\n", summary.total_engagements)?;

        if summary.current_engagements.is_empty() {
            writeln!(&mut response, "_No current engagement_")?;
        } else {
            writeln!(&mut response, "**Current**")?;
            for eng in &summary.current_engagements {
                writeln!(
                    &mut response,
                    "• {} (until {})",
                    eng.name,
                    eng.end_date.format(DATE_FORMAT)
                )?;
            }
        }
        if !summary.upcoming_engagements.is_empty() {
            writeln!(&mut response, "**Upcoming**")?;
            for eng in &summary.upcoming_engagements {
                writeln!(
                    &mut response,
                    "• {} (from {})",
                    eng.name,
                    eng.start_date.format(DATE_FORMAT)
                )?;
            }
        }
        if !summary.recent_leaves.is_empty() {
            writeln!(&mut response, "**Recent leaves**")?;
            for lev in &summary.recent_leaves {
                writeln!(
                    &mut response,
                    "• {} {} → {}",
                    lev.leave_type.label(),
                    lev.start_date.format(DATE_FORMAT),
                    lev.end_date.format(DATE_FORMAT)
                )?;
            }
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Shows everyone's status today and team utilization.
    #[poise::command(slash_command, prefix_command)]
    pub async fn team(
        ctx: Context<'_>,
        #[description = "Show the monthly utilization of this year"] year: Option<i32>,
    ) -> Result<()> {
        let data = ctx.data();
        let today = today();
        let schedules = employee::load_active_schedules(&data.database).await?;
        let stats = dashboard::team_statistics(&schedules, &data.settings, today);

        let mut response = format!(
            "👥 **Team** · {} people ({} managers)\n",
            stats.total, stats.managers
        );
        writeln!(
            &mut response,
            "Utilization: {:.2}% · high {} · medium {} · low {}\n",
            stats.team_utilization,
            stats.utilization_buckets.high,
            stats.utilization_buckets.medium,
            stats.utilization_buckets.low
        )?;

        for schedule in &schedules {
            let current = status::current_status(schedule, today);
            writeln!(
                &mut response,
                "• **{}**: {}",
                schedule.employee.full_name,
                status::format_status(&current)
            )?;
        }

        if let Some(year) = year {
            writeln!(&mut response, "\n**Monthly utilization {year}**")?;
            for month in utilization::monthly_team_utilization(&schedules, year) {
                writeln!(&mut response, "{}: {:.2}%", month.month_name(), month.rate)?;
            }
        } else {
            let month_range = utilization::month_range(today.year(), today.month());
            if let Some(range) = month_range {
                let rate = utilization::team_utilization_for_period(&schedules, range);
                writeln!(&mut response, "\nThis month so far: {rate:.2}%")?;
            }
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Shows the engagement and staffing overview.
    #[poise::command(slash_command, prefix_command)]
    pub async fn dashboard(ctx: Context<'_>) -> Result<()> {
        let data = ctx.data();
        let today = today();
        let summary = dashboard::load_dashboard(&data.database, today).await?;

        let mut response = String::from("📊 **Dashboard**\n");
        writeln!(
            &mut response,
            "Engagements: {} ongoing · {} upcoming · {} completed",
            summary.ongoing_engagements, summary.upcoming_engagements, summary.completed_engagements
        )?;
        writeln!(
            &mut response,
            "People: {} total · {} busy · {} available ({:.2}% busy)",
            summary.total_employees,
            summary.engaged_employees,
            summary.available_employees,
            summary.busy_percentage
        )?;

        let caller = ctx.author().id.to_string();
        if let Some(emp) = employee::get_employee_by_discord_id(&data.database, &caller).await? {
            let schedule = employee::load_schedule(&data.database, emp.id).await?;
            let alerts =
                status::upcoming_alerts(&schedule, today, data.settings.alert_engagement_days);
            if !alerts.is_empty() {
                writeln!(&mut response, "\n🔔 **Starting soon for you**")?;
                for alert in alerts {
                    writeln!(
                        &mut response,
                        "• {} in {} days ({})",
                        alert.name,
                        alert.days_until_start,
                        alert.start_date.format(DATE_FORMAT)
                    )?;
                }
            }
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Books a training, vacation or work-from-home leave.
    #[poise::command(slash_command, prefix_command)]
    pub async fn leave(
        ctx: Context<'_>,
        #[description = "Kind of leave"] kind: LeaveChoice,
        #[description = "First day (YYYY-MM-DD)"] start: String,
        #[description = "Last day (YYYY-MM-DD)"] end: String,
        #[description = "Note"] note: Option<String>,
        #[description = "Employee (defaults to you)"]
        #[autocomplete = "autocomplete::autocomplete_employee"]
        employee: Option<String>,
    ) -> Result<()> {
        let range = DateRange::parse(&start, &end)?;
        let Some(emp) = resolve_employee(ctx, employee.as_deref()).await? else {
            return Ok(());
        };
        let data = ctx.data();
        let leave_type = LeaveType::from(kind);

        let schedule = employee::load_schedule(&data.database, emp.id).await?;
        let clashes = availability::has_conflict(&schedule, range.start(), range.end());

        leave::create_leave(
            &data.database,
            data.notifier.as_ref(),
            emp.id,
            leave_type,
            range,
            note.as_deref().unwrap_or_default(),
        )
        .await?;

        let mut response = format!(
            "✅ Booked {} for **{}** ({range})",
            leave_type.label(),
            emp.full_name
        );
        if clashes {
            response.push_str("\n⚠️ This overlaps existing commitments.");
        }
        ctx.say(response).await?;
        Ok(())
    }

    /// Adds an employee.
    #[poise::command(slash_command, prefix_command)]
    pub async fn add_employee(
        ctx: Context<'_>,
        #[description = "Login name"] username: String,
        #[description = "Full name"] full_name: String,
        #[description = "Email address"] email: String,
        #[description = "Is a manager"] manager: Option<bool>,
        #[description = "Linked Discord account"] discord_user: Option<serenity::User>,
    ) -> Result<()> {
        let user_type = if manager.unwrap_or(false) {
            UserType::Manager
        } else {
            UserType::Employee
        };
        let created = employee::create_employee(
            &ctx.data().database,
            NewEmployee {
                username,
                full_name,
                email,
                user_type,
                discord_user_id: discord_user.map(|user| user.id.to_string()),
                date_joined: today(),
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Added **{}** (`{}`)",
            created.full_name, created.username
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
