use clap::Args;
use sukoon_core::chat::{responder_from_config, Assistant, KeywordResponder};
use sukoon_core::{Config, Responder};

use super::CmdResult;

#[derive(Args)]
pub struct ChatArgs {
    /// Message to send
    #[arg(required = true, num_args = 1..)]
    message: Vec<String>,
    /// Use canned offline replies even if an API key is configured
    #[arg(long)]
    offline: bool,
}

pub async fn run(args: ChatArgs) -> CmdResult {
    let config = Config::load_or_default();
    let assistant = if args.offline {
        Assistant::Offline(KeywordResponder)
    } else {
        responder_from_config(&config.chat)?
    };

    let reply = assistant.reply(&args.message.join(" ")).await?;
    println!("{reply}");
    Ok(())
}
