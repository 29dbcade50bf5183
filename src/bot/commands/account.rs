//! Account Discord commands - `register`, `balance` and `history`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::choices::PlatformChoice, current_user},
        core::{balance, earning, purchase, refund, spending, user},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    const HISTORY_LIMIT: usize = 5;

    /// Creates your V-Bucks ledger.
    #[poise::command(slash_command, prefix_command)]
    pub async fn register(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Your Epic Games display name"] epic_username: Option<String>,
        #[description = "The platform you mainly play on"] platform: Option<PlatformChoice>,
    ) -> Result<()> {
        let discord_id = ctx.author().id.to_string();
        let created = user::register_user(
            &ctx.data().database,
            &discord_id,
            &ctx.author().name,
            epic_username.as_deref(),
            platform.map(Into::into),
        )
        .await?;

        ctx.say(format!(
            "✅ Welcome, {}! Your ledger starts at 0 V-Bucks.",
            created.username
        ))
        .await?;
        Ok(())
    }

    /// Shows your balance and ledger totals.
    #[poise::command(slash_command, prefix_command)]
    pub async fn balance(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let user = current_user(ctx).await?;
        let summary = balance::get_user_summary(&ctx.data().database, user.id).await?;

        let mut spent_money: Vec<String> = summary
            .real_money
            .iter()
            .map(|(currency, amount)| format!("{amount:.2} {currency}"))
            .collect();
        if spent_money.is_empty() {
            spent_money.push("nothing yet".to_string());
        }

        let embed = serenity::CreateEmbed::default()
            .title(format!("💰 {} V-Bucks", summary.balance))
            .description(format!("Ledger of {}", user.username))
            .field("Purchased", summary.total_purchased.to_string(), true)
            .field("Earned", summary.total_earned.to_string(), true)
            .field("Spent", summary.total_spent.to_string(), true)
            .field("Refunded", summary.total_refunded.to_string(), true)
            .field("Real money", spent_money.join("\n"), false);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Lists your most recent ledger records.
    #[poise::command(slash_command, prefix_command)]
    pub async fn history(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let user = current_user(ctx).await?;
        let db = &ctx.data().database;

        let purchases: Vec<String> = purchase::list_purchases_for_user(db, user.id)
            .await?
            .into_iter()
            .take(HISTORY_LIMIT)
            .map(|p| {
                format!(
                    "#{} {} - {:.2} {} → {} V-Bucks ({})",
                    p.id, p.source_name, p.amount, p.currency, p.currency_earned, p.date
                )
            })
            .collect();
        let earnings: Vec<String> = earning::list_earnings_for_user(db, user.id)
            .await?
            .into_iter()
            .take(HISTORY_LIMIT)
            .map(|e| {
                format!(
                    "#{} {} - {} V-Bucks ({})",
                    e.id,
                    e.name.as_deref().unwrap_or(e.earning_type.label()),
                    e.amount,
                    e.date
                )
            })
            .collect();
        let spendings: Vec<String> = spending::list_spendings_for_user(db, user.id)
            .await?
            .into_iter()
            .take(HISTORY_LIMIT)
            .map(|s| {
                let marker = if s.refunded { " (refunded)" } else { "" };
                format!("#{} {} - {} V-Bucks ({}){marker}", s.id, s.item_name, s.amount, s.date)
            })
            .collect();
        let refunds = refund::list_refunds_for_user(db, user.id).await?.len();

        let section = |lines: Vec<String>| {
            if lines.is_empty() {
                "none".to_string()
            } else {
                lines.join("\n")
            }
        };

        let embed = serenity::CreateEmbed::default()
            .title(format!("📜 History of {}", user.username))
            .field("Purchases", section(purchases), false)
            .field("Earnings", section(earnings), false)
            .field("Spendings", section(spendings), false)
            .footer(serenity::CreateEmbedFooter::new(format!("{refunds} refund(s) in total")));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

pub use inner::*;
