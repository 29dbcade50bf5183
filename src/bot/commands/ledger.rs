//! Ledger Discord commands - `purchase`, `earn`, `spend` and the delete commands.
//!
//! Every command forwards to a `core` entry point, which validates, writes and
//! reconciles the balance in one transaction. Rejections surface through the
//! framework error handler.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::{
                choices::{EarningChoice, PurchaseChoice, SpendingChoice},
                parse_date, parse_record_id,
            },
            current_user,
            handlers::autocomplete,
        },
        core::{
            balance,
            earning::{self, EarningInput},
            purchase::{self, PurchaseInput},
            spending::{self, SpendingInput},
        },
        errors::{Error, Result},
    };

    /// Records a real-money purchase.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, prefix_command)]
    pub async fn purchase(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "What you bought"] category: PurchaseChoice,
        #[description = "Product name, e.g. '2800 V-Bucks'"] name: String,
        #[description = "Price paid (e.g., 24.99)"] price: f64,
        #[description = "V-Bucks received, 0 for skin packs"] vbucks: i64,
        #[description = "Currency code; defaults to the configured one"]
        #[autocomplete = "autocomplete::autocomplete_currency"]
        currency: Option<String>,
        #[description = "Date as YYYY-MM-DD; defaults to today"] date: Option<String>,
        #[description = "Optional notes"] notes: Option<String>,
    ) -> Result<()> {
        let user = current_user(ctx).await?;
        let data = ctx.data();

        let input = PurchaseInput {
            category: category.into(),
            source_name: name,
            amount: price,
            currency_earned: vbucks,
            date: parse_date(date.as_deref())?,
            currency: data.settings.resolve_currency(currency.as_deref())?,
            notes: notes.unwrap_or_default(),
        };
        let created = purchase::create_purchase(&data.database, user.id, input).await?;
        let new_balance = balance::get_cached_balance(&data.database, user.id).await?;

        ctx.say(format!(
            "✅ Recorded {} for {:.2} {} (+{} V-Bucks). Balance: {new_balance} V-Bucks (Purchase ID: {})",
            created.source_name, created.amount, created.currency, created.currency_earned, created.id
        ))
        .await?;
        Ok(())
    }

    /// Records V-Bucks earned in game.
    #[poise::command(slash_command, prefix_command)]
    pub async fn earn(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Where the V-Bucks came from"] source: EarningChoice,
        #[description = "V-Bucks earned"] vbucks: i64,
        #[description = "Optional name, e.g. 'Chapter 5 Season 2'"] name: Option<String>,
        #[description = "Date as YYYY-MM-DD; defaults to today"] date: Option<String>,
    ) -> Result<()> {
        let user = current_user(ctx).await?;
        let db = &ctx.data().database;

        let input = EarningInput {
            earning_type: source.into(),
            amount: vbucks,
            date: parse_date(date.as_deref())?,
            name,
        };
        let created = earning::create_earning(db, user.id, input).await?;
        let new_balance = balance::get_cached_balance(db, user.id).await?;

        ctx.say(format!(
            "✅ Earned {} V-Bucks from {}. Balance: {new_balance} V-Bucks",
            created.amount,
            created.earning_type.label()
        ))
        .await?;
        Ok(())
    }

    /// Records V-Bucks spent in the item shop.
    #[poise::command(slash_command, prefix_command)]
    pub async fn spend(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item name, e.g. 'Renegade Raider'"] item: String,
        #[description = "Kind of item"] category: SpendingChoice,
        #[description = "V-Bucks spent"] vbucks: i64,
        #[description = "Date as YYYY-MM-DD; defaults to today"] date: Option<String>,
    ) -> Result<()> {
        let user = current_user(ctx).await?;
        let db = &ctx.data().database;

        let input = SpendingInput {
            item_name: item,
            category: category.into(),
            amount: vbucks,
            date: parse_date(date.as_deref())?,
        };
        let created = spending::create_spending(db, user.id, input).await?;
        let new_balance = balance::get_cached_balance(db, user.id).await?;

        ctx.say(format!(
            "✅ Spent {} V-Bucks on {}. Balance: {new_balance} V-Bucks (Spending ID: {})",
            created.amount, created.item_name, created.id
        ))
        .await?;
        Ok(())
    }

    /// Deletes one of your purchases and the V-Bucks it granted.
    #[poise::command(slash_command, prefix_command)]
    pub async fn delete_purchase(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Purchase to delete"]
        #[autocomplete = "autocomplete::autocomplete_purchase"]
        purchase: String,
    ) -> Result<()> {
        let user = current_user(ctx).await?;
        let db = &ctx.data().database;
        let purchase_id = parse_record_id(&purchase)?;

        purchase::delete_purchase(db, user.id, purchase_id).await?;
        let new_balance = balance::get_cached_balance(db, user.id).await?;

        ctx.say(format!(
            "🗑️ Deleted purchase #{purchase_id}. Balance: {new_balance} V-Bucks"
        ))
        .await?;
        Ok(())
    }

    /// Deletes one of your spendings, along with its refund.
    #[poise::command(slash_command, prefix_command)]
    pub async fn delete_spending(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Spending to delete"]
        #[autocomplete = "autocomplete::autocomplete_spending"]
        spending: String,
    ) -> Result<()> {
        let user = current_user(ctx).await?;
        let db = &ctx.data().database;
        let spending_id = parse_record_id(&spending)?;

        spending::delete_spending(db, user.id, spending_id).await?;
        let new_balance = balance::get_cached_balance(db, user.id).await?;

        ctx.say(format!(
            "🗑️ Deleted spending #{spending_id}. Balance: {new_balance} V-Bucks"
        ))
        .await?;
        Ok(())
    }
}

pub use inner::*;
