//! Refund Discord commands - `refund` and `unrefund`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::{choices::ReasonChoice, parse_record_id},
            current_user,
            handlers::autocomplete,
        },
        core::{
            balance,
            refund::{self as refunds, RefundInput},
        },
        errors::{Error, Result},
    };

    /// Refunds one of your spendings and returns its V-Bucks.
    #[poise::command(slash_command, prefix_command)]
    pub async fn refund(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Spending to refund"]
        #[autocomplete = "autocomplete::autocomplete_refundable_spending"]
        spending: String,
        #[description = "Why you refunded it"] reason: Option<ReasonChoice>,
        #[description = "Optional notes"] notes: Option<String>,
    ) -> Result<()> {
        let user = current_user(ctx).await?;
        let db = &ctx.data().database;

        let input = RefundInput {
            spending_id: parse_record_id(&spending)?,
            reason: reason.map(Into::into),
            notes: notes.unwrap_or_default(),
        };
        let created = refunds::create_refund(db, user.id, input).await?;
        let new_balance = balance::get_cached_balance(db, user.id).await?;

        ctx.say(format!(
            "↩️ Refunded {} V-Bucks. Balance: {new_balance} V-Bucks",
            created.vbucks_returned
        ))
        .await?;
        Ok(())
    }

    /// Removes the refund of a spending so it counts as spent again.
    #[poise::command(slash_command, prefix_command)]
    pub async fn unrefund(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Refunded spending"]
        #[autocomplete = "autocomplete::autocomplete_refunded_spending"]
        spending: String,
    ) -> Result<()> {
        let user = current_user(ctx).await?;
        let db = &ctx.data().database;
        let spending_id = parse_record_id(&spending)?;

        let Some(existing) = refunds::get_refund_for_spending(db, spending_id).await? else {
            ctx.say(format!("❌ Spending #{spending_id} has no refund.")).await?;
            return Ok(());
        };
        refunds::delete_refund(db, user.id, existing.id).await?;
        let new_balance = balance::get_cached_balance(db, user.id).await?;

        ctx.say(format!(
            "✅ Refund removed from spending #{spending_id}. Balance: {new_balance} V-Bucks"
        ))
        .await?;
        Ok(())
    }
}

pub use inner::*;
