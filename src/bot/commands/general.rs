//! General Discord commands - ping and help.
//! These commands don't touch the database.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::Context,
        errors::Result,
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let help_text = "**StaffingBuddy Help**\n\
        Dates are entered as `YYYY-MM-DD`; every range includes both ends.\n\n\
        **People**\n\
        • `/status [employee]` - What someone is doing today.\n\
        • `/next_event [employee]` - Their next engagement or leave.\n\
        • `/availability <employee> <start> <end>` - Free and busy days in a range.\n\
        • `/free <start> <end>` - Everyone without commitments in a range.\n\
        • `/workload [employee]` - Current and upcoming engagements, utilization.\n\
        • `/leave <type> <start> <end> [note] [employee]` - Book training, vacation or WFH.\n\
        • `/team [year]` - Team status and utilization.\n\
        • `/dashboard` - Engagement and staffing overview.\n\n\
        **Engagements**\n\
        • `/engagements [phase]` - List engagements.\n\
        • `/engagement_info <engagement>` - Progress, team, findings and cost.\n\
        • `/create_engagement <name> <client> <service> <start> <end> [scope]`\n\
        • `/assign <engagement> <employee>` / `/unassign <engagement> <employee>`\n\n\
        **Clients & findings**\n\
        • `/clients`, `/client_report <client>`, `/add_client <name> <acronym> <code>`\n\
        • `/add_vulnerability <engagement> <severity> <title>`\n\
        • `/fix_vulnerability <id>`, `/overdue`\n\n\
        **Admin**\n\
        • `/add_employee <username> <full_name> <email> [manager] [discord_user]`\n\
        • `/ping` - Checks if the bot is responsive.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
