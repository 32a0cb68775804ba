//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions are filtered case-insensitively on the partial input and capped at
//! Discord's limit of 25 entries.

use crate::{
    bot::Context,
    core::{client, employee, engagement},
};

const DISCORD_AUTOCOMPLETE_LIMIT: usize = 25;

fn filter_names(names: impl IntoIterator<Item = String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .collect();
    matching.sort();
    matching.dedup();
    matching.truncate(DISCORD_AUTOCOMPLETE_LIMIT);
    matching
}

/// Suggests active employees by username.
pub async fn autocomplete_employee(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let Ok(employees) = employee::get_active_employees(&ctx.data().database).await else {
        return Vec::new();
    };
    filter_names(employees.into_iter().map(|emp| emp.username), partial)
}

/// Suggests engagement names.
pub async fn autocomplete_engagement(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let Ok(engagements) = engagement::get_all_engagements(&ctx.data().database).await else {
        return Vec::new();
    };
    filter_names(engagements.into_iter().map(|eng| eng.name), partial)
}

/// Suggests client names.
pub async fn autocomplete_client(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let Ok(clients) = client::get_all_clients(&ctx.data().database).await else {
        return Vec::new();
    };
    filter_names(clients.into_iter().map(|c| c.name), partial)
}
