use clap::Parser;
use gatebot::application::machine::ConversationMachine;
use gatebot::application::presenter::Presenter;
use gatebot::application::router::EventRouter;
use gatebot::config::Settings;
use gatebot::domain::ports::{ChatTransportRef, GatewayRef, StateStoreRef};
use gatebot::infrastructure::http_gateway::HttpGateway;
use gatebot::infrastructure::in_memory::InMemoryStateStore;
use gatebot::infrastructure::telegram::TelegramTransport;
use gatebot::interfaces::telegram;
use miette::{IntoDiagnostic, Result};
use std::sync::Arc;
use teloxide::Bot;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; settings may come from the real environment.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatebot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::parse();
    settings.validate().into_diagnostic()?;
    tracing::info!(?settings, "Starting");

    let gateway: GatewayRef = Arc::new(
        HttpGateway::new(
            settings.api_url.clone(),
            settings.bot_secret.clone(),
            settings.gateway_timeout(),
        )
        .into_diagnostic()?,
    );
    let store: StateStoreRef = Arc::new(InMemoryStateStore::new());

    let bot = Bot::new(settings.bot_token.clone());
    let transport: ChatTransportRef = Arc::new(TelegramTransport::new(bot.clone()));

    let machine = ConversationMachine::new(store, gateway);
    let presenter = Presenter::new(settings.brand.clone(), settings.site_url.clone());
    let router = Arc::new(EventRouter::new(machine, transport, presenter));

    telegram::run(bot, router).await;

    tracing::info!("Bot stopped");
    Ok(())
}
