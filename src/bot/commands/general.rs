//! General Discord commands - ping and help.
//! These commands don't touch the ledger.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**V-Bucks Tracker Help**\n\
        Track what you pay, earn, spend and get refunded in Fortnite.\n\n\
        **Account**\n\
        • `/register [epic_username] [platform]` - Creates your ledger.\n\
        • `/balance` - Shows your balance and totals.\n\
        • `/history` - Lists your latest records.\n\n\
        **Ledger**\n\
        • `/purchase <category> <name> <price> <vbucks> [currency] [date] [notes]` - Records a real-money purchase.\n\
        • `/earn <type> <vbucks> [name] [date]` - Records V-Bucks earned in game.\n\
        • `/spend <item> <category> <vbucks> [date]` - Records V-Bucks spent.\n\
        • `/refund <spending> [reason] [notes]` - Refunds a spending.\n\
        • `/unrefund <spending>` - Removes a refund.\n\
        • `/delete_purchase <purchase>` and `/delete_spending <spending>` - Remove records.\n\n\
        Dates use the `YYYY-MM-DD` format and default to today.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
