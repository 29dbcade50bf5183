//! Autocomplete handlers for Discord slash command parameters.
//!
//! Record suggestions are formatted as `#<id> <name> (...)` so the chosen entry can
//! be turned back into an id with `parse_record_id`. Only the author's own records
//! are suggested.

use crate::{
    bot::{BotData, current_user},
    core::{purchase, spending},
    entities,
    errors::Error,
};

/// Discord autocomplete limit
const MAX_SUGGESTIONS: usize = 25;

fn matching<T>(records: &[T], partial: &str, label: impl Fn(&T) -> String) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    records
        .iter()
        .map(label)
        .filter(|text| text.to_lowercase().contains(&partial_lower))
        .take(MAX_SUGGESTIONS)
        .collect()
}

fn spending_label(spending: &entities::spending::Model) -> String {
    format!(
        "#{} {} ({} V-Bucks, {})",
        spending.id, spending.item_name, spending.amount, spending.date
    )
}

/// Suggests the configured currency codes.
pub async fn autocomplete_currency(ctx: poise::Context<'_, BotData, Error>, partial: &str) -> Vec<String> {
    let partial_upper = partial.trim().to_uppercase();
    ctx.data()
        .settings
        .currencies
        .iter()
        .filter(|code| code.starts_with(&partial_upper))
        .cloned()
        .collect()
}

/// Suggests the author's purchases, newest first.
pub async fn autocomplete_purchase(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(user) = current_user(ctx).await else {
        return Vec::new();
    };
    let Ok(purchases) = purchase::list_purchases_for_user(&ctx.data().database, user.id).await
    else {
        return Vec::new();
    };

    matching(&purchases, partial, |p| {
        format!("#{} {} ({:.2} {}, {})", p.id, p.source_name, p.amount, p.currency, p.date)
    })
}

/// Suggests all of the author's spendings, newest first.
pub async fn autocomplete_spending(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(user) = current_user(ctx).await else {
        return Vec::new();
    };
    let Ok(spendings) = spending::list_spendings_for_user(&ctx.data().database, user.id).await
    else {
        return Vec::new();
    };

    matching(&spendings, partial, spending_label)
}

/// Suggests the author's spendings that are not refunded yet.
pub async fn autocomplete_refundable_spending(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(user) = current_user(ctx).await else {
        return Vec::new();
    };
    let Ok(spendings) = spending::list_refundable_spendings(&ctx.data().database, user.id).await
    else {
        return Vec::new();
    };

    matching(&spendings, partial, spending_label)
}

/// Suggests the author's refunded spendings.
pub async fn autocomplete_refunded_spending(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(user) = current_user(ctx).await else {
        return Vec::new();
    };
    let Ok(spendings) = spending::list_spendings_for_user(&ctx.data().database, user.id).await
    else {
        return Vec::new();
    };

    let refunded: Vec<_> = spendings.into_iter().filter(|s| s.refunded).collect();
    matching(&refunded, partial, spending_label)
}
