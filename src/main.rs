use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use thunder_wallet::api::types::{FixedSide, Recipient};
use thunder_wallet::config::AppConfig;
use thunder_wallet::logging::{init_tracing, mask_token};
use thunder_wallet::screens::bills::{by_category, BillCategory, BillForm};
use thunder_wallet::screens::convert::{ConvertScreen, ConvertStatus};
use thunder_wallet::screens::dashboard::Dashboard;
use thunder_wallet::screens::executor::TransferExecutor;
use thunder_wallet::screens::pin::{is_valid_pin, DEFAULT_PIN_LENGTH};
use thunder_wallet::screens::profile::ProfileScreen;
use thunder_wallet::screens::receive::{ReceiveScreen, ReceiveView};
use thunder_wallet::screens::scope::ScreenScope;
use thunder_wallet::screens::wizard::{PaymentDraft, PaymentWizard, WizardStep};
use thunder_wallet::screens::{DisplayRow, LoadState};
use thunder_wallet::{BearerToken, FileTokenStore, ThunderClient, TokenStore, WalletService};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::signal;
use tracing::{error, info};

/// Attempts at the PIN prompt before giving up.
const PIN_ATTEMPTS: usize = 3;

#[derive(Parser, Debug)]
#[command(name = "thunder", version, about = "Thunder wallet in the terminal")]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store the bearer token used for every request
    Login {
        #[arg(long)]
        token: String,
    },

    /// Forget the stored token
    Logout,

    /// Wallets with their recent activity
    Wallets,

    /// Raw activity for one wallet (never fails; empty on error)
    Activity { wallet_id: String },

    /// Show the signed-in user
    Profile,

    /// Transaction PIN management
    Pin {
        #[command(subcommand)]
        action: PinAction,
    },

    /// List billers, optionally for one category
    Bills {
        #[arg(long)]
        category: Option<String>,
    },

    /// Deposit details for a currency
    Receive {
        currency: String,

        /// Create the wallet if there is none, using this currency id
        #[arg(long = "create", requires = "network")]
        currency_id: Option<String>,

        #[arg(long)]
        network: Option<String>,
    },

    /// Send to a Thunder user by email, or to an external address
    Send {
        #[arg(long)]
        amount: String,

        #[arg(long)]
        currency: String,

        #[arg(long, conflicts_with = "address")]
        email: Option<String>,

        #[arg(long, requires = "network")]
        address: Option<String>,

        #[arg(long)]
        network: Option<String>,
    },

    /// Pay a biller through the payment wizard
    PayBill {
        #[arg(long)]
        biller: String,

        /// Biller field as name=value, repeatable
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        #[arg(long, default_value = "")]
        amount: String,

        /// Thunder account that settles bill payments
        #[arg(long, default_value = "bills@thunder.app")]
        settlement_email: String,
    },

    /// Convert between two of your wallets
    Convert {
        #[arg(long)]
        from_wallet: String,

        #[arg(long)]
        to_currency: String,

        #[arg(long)]
        amount: String,

        #[arg(long, value_enum, default_value_t = Side::Source)]
        fixed: Side,
    },
}

#[derive(Subcommand, Debug)]
enum PinAction {
    Set,
    Reset,
    Verify { code: String },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Side {
    Source,
    Destination,
}

impl From<Side> for FixedSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Source => FixedSide::Source,
            Side::Destination => FixedSide::Destination,
        }
    }
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{}`", raw))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("interrupted, abandoning in-flight requests");
}

struct App {
    config: AppConfig,
    store: FileTokenStore,
    scope: ScreenScope,
    input: Lines<BufReader<Stdin>>,
}

impl App {
    fn client(&self) -> anyhow::Result<ThunderClient> {
        let token = self.store.load().context("reading session")?;
        Ok(ThunderClient::new(&self.config.api, token)?)
    }

    async fn prompt(&mut self, label: &str) -> anyhow::Result<String> {
        eprint!("{}: ", label);
        self.input
            .next_line()
            .await?
            .map(|line| line.trim().to_string())
            .ok_or_else(|| anyhow!("input closed"))
    }

    async fn run(&mut self, cmd: Commands) -> anyhow::Result<()> {
        match cmd {
            Commands::Login { token } => {
                let token = BearerToken::new(token)?;
                self.store.save(&token)?;
                info!(token = %mask_token(token.expose()), "session saved");
                println!("Signed in.");
            }
            Commands::Logout => {
                ProfileScreen::new().sign_out(&self.store)?;
                println!("Signed out.");
            }
            Commands::Wallets => self.wallets().await?,
            Commands::Activity { wallet_id } => {
                let client = self.client()?;
                let response = client.wallet_activity(&wallet_id).await;
                println!("{}", serde_json::to_string_pretty(&response)?);
            }
            Commands::Profile => {
                let client = self.client()?;
                let mut screen = ProfileScreen::new();
                screen.load(&client, &self.scope).await;
                let profile = screen
                    .profile()
                    .ok_or_else(|| anyhow!(screen.state().error().unwrap_or("cancelled").to_string()))?;
                println!("{}", profile.display_name());
                if let Some(email) = &profile.email {
                    println!("  email: {}", email);
                }
                if let Some(phone) = &profile.phone_number {
                    println!("  phone: {}", phone);
                }
                println!("  transaction PIN: {}", if profile.has_pin == Some(true) { "set" } else { "not set" });
            }
            Commands::Pin { action } => self.pin(action).await?,
            Commands::Bills { category } => list_bills(category.as_deref())?,
            Commands::Receive {
                currency,
                currency_id,
                network,
            } => self.receive(&currency, currency_id, network).await?,
            Commands::Send {
                amount,
                currency,
                email,
                address,
                network,
            } => {
                let recipient = match (email, address, network) {
                    (Some(email), None, _) => Recipient::Email(email),
                    (None, Some(address), Some(network)) => Recipient::Address { address, network },
                    _ => bail!("pass --email, or --address with --network"),
                };
                let amount = Decimal::from_str(amount.trim()).context("invalid amount")?;
                let title = format!("Send to {}", recipient.identifier());
                let draft = PaymentDraft::new(title, amount, currency.to_ascii_uppercase());
                self.wizard(draft, recipient).await?;
            }
            Commands::PayBill {
                biller,
                fields,
                amount,
                settlement_email,
            } => {
                let mut form = BillForm::new(&biller)?;
                for (name, value) in fields {
                    form.set_field(&name, value);
                }
                form.set_amount(amount);
                let draft = form.to_draft()?;
                self.wizard(draft, Recipient::Email(settlement_email)).await?;
            }
            Commands::Convert {
                from_wallet,
                to_currency,
                amount,
                fixed,
            } => self.convert(from_wallet, to_currency, &amount, fixed.into()).await?,
        }
        Ok(())
    }

    async fn wallets(&mut self) -> anyhow::Result<()> {
        let client = self.client()?;
        let mut dashboard = Dashboard::new();
        dashboard.load(&client, &self.scope).await;
        if let Some(message) = dashboard.state().error() {
            bail!(message.to_string());
        }
        for card in dashboard.cards() {
            println!(
                "[{}] {} {}  ({})",
                card.option.glyph,
                card.option.name,
                card.option.amount_label(),
                card.wallet.wallet_id
            );
            for item in card.activity.iter().take(5) {
                println!(
                    "    {} {} {}",
                    item.kind.as_deref().unwrap_or("-"),
                    item.amount.as_deref().unwrap_or("-"),
                    item.status.as_deref().unwrap_or("")
                );
            }
        }
        Ok(())
    }

    async fn pin(&mut self, action: PinAction) -> anyhow::Result<()> {
        let client = self.client()?;
        let mut screen = ProfileScreen::new();
        let first_time = matches!(action, PinAction::Set);
        match action {
            PinAction::Verify { code } => {
                screen.verify_reset_code(&client, &code, &self.scope).await?;
                println!("Code accepted. Run `thunder pin reset` to choose a new PIN.");
            }
            PinAction::Set | PinAction::Reset => {
                let pin = self.prompt("New PIN").await?;
                let confirm = self.prompt("Confirm PIN").await?;
                if first_time {
                    screen.set_pin(&client, &pin, &confirm, &self.scope).await?;
                } else {
                    screen.reset_pin(&client, &pin, &confirm, &self.scope).await?;
                }
                println!("PIN saved.");
            }
        }
        Ok(())
    }

    async fn receive(
        &mut self,
        currency: &str,
        currency_id: Option<String>,
        network: Option<String>,
    ) -> anyhow::Result<()> {
        let client = self.client()?;
        let mut screen = ReceiveScreen::new(currency);
        screen.load(&client, &self.scope).await;

        let missing = matches!(screen.state(), LoadState::Ready(ReceiveView::NoWallet));
        if let (true, Some(id), Some(net)) = (missing, currency_id.as_deref(), network.as_deref()) {
            screen.create_wallet(&client, id, net, &self.scope).await?;
        }

        match screen.state() {
            LoadState::Ready(ReceiveView::Deposit { address, network, .. }) => {
                println!("{}", address);
                if let Some(network) = network {
                    println!("network: {}", network);
                }
            }
            LoadState::Ready(ReceiveView::NoAddress { wallet_id }) => {
                println!("Wallet {} has no deposit address.", wallet_id);
            }
            LoadState::Ready(ReceiveView::NoWallet) => {
                println!(
                    "No {} wallet yet. Re-run with --create <currency-id> --network <network>.",
                    screen.currency_code()
                );
            }
            LoadState::Failed(message) => bail!(message.clone()),
            LoadState::Loading => {}
        }
        Ok(())
    }

    async fn wizard(&mut self, draft: PaymentDraft, recipient: Recipient) -> anyhow::Result<()> {
        let client = Arc::new(self.client()?);
        let executor = TransferExecutor::new(client.clone(), recipient);
        let mut wizard = PaymentWizard::new(draft, Arc::new(executor));

        wizard.load_methods(client.as_ref(), &self.scope).await;
        if let Some(message) = wizard.selector().state().error() {
            bail!(message.to_string());
        }
        if wizard.methods().is_empty() {
            bail!("no {} wallet to pay from", wizard.draft().currency);
        }

        loop {
            match wizard.step() {
                WizardStep::SelectMethod => {
                    for option in wizard.methods() {
                        println!("  {}  {} {}", option.id, option.name, option.amount_label());
                    }
                    let id = self.prompt("Pay from (wallet id)").await?;
                    if let Err(e) = wizard.select_method(&id) {
                        println!("{}", e);
                    }
                }
                WizardStep::Confirm => {
                    if wizard.quote().is_none() {
                        wizard.load_quote(&self.scope).await?;
                        if let Some(message) = wizard.quote_error() {
                            println!("{}", message);
                            match self.prompt("Retry? [y/N/b=back]").await?.to_ascii_lowercase().as_str() {
                                "y" => continue,
                                "b" => {
                                    wizard.back();
                                    continue;
                                }
                                _ => bail!("payment cancelled"),
                            }
                        }
                    }
                    let screen = wizard
                        .confirmation()
                        .ok_or_else(|| anyhow!("nothing to confirm"))?;
                    print_rows(&screen.rows());
                    if screen.payload().cashback_available.is_some() {
                        let answer = self.prompt("Toggle cashback? [y/N]").await?;
                        if answer.eq_ignore_ascii_case("y") {
                            wizard.toggle_cashback()?;
                            continue;
                        }
                    }
                    match self.prompt("Pay? [y/N/b=back]").await?.to_ascii_lowercase().as_str() {
                        "y" => wizard.pay()?,
                        "b" => {
                            wizard.back();
                        }
                        _ => bail!("payment cancelled"),
                    }
                }
                WizardStep::EnterPin => {
                    for _ in 0..PIN_ATTEMPTS {
                        let pin = self.prompt("Transaction PIN").await?;
                        if !is_valid_pin(&pin) {
                            println!("PIN must be {} digits.", DEFAULT_PIN_LENGTH);
                            continue;
                        }
                        for (i, c) in pin.chars().enumerate() {
                            wizard.pin_input(i, &c.to_string(), &self.scope).await?;
                        }
                        if wizard.step() == WizardStep::Success {
                            break;
                        }
                        if let Some(message) = wizard.pin().error() {
                            println!("{}", message);
                        }
                    }
                    if wizard.step() != WizardStep::Success {
                        bail!("payment not completed");
                    }
                }
                WizardStep::Success => {
                    let success = wizard
                        .success()
                        .ok_or_else(|| anyhow!("missing receipt"))?;
                    let receipt = success.receipt();
                    println!("{}  {}", receipt.title, receipt.amount);
                    print_rows(&receipt.rows);
                    if let Some(reference) = &receipt.reference {
                        println!("Reference: {}", reference);
                    }
                    return Ok(());
                }
            }
        }
    }

    async fn convert(
        &mut self,
        from_wallet: String,
        to_currency: String,
        amount: &str,
        side: FixedSide,
    ) -> anyhow::Result<()> {
        let client = self.client()?;
        let mut screen = ConvertScreen::new(from_wallet, to_currency);
        screen.set_fixed_side(side);
        screen.request_quote(&client, amount, &self.scope).await?;
        print_rows(&screen.breakdown(chrono::Utc::now()));

        for _ in 0..PIN_ATTEMPTS {
            let pin = self.prompt("Transaction PIN").await?;
            if !is_valid_pin(&pin) {
                println!("PIN must be {} digits.", DEFAULT_PIN_LENGTH);
                continue;
            }
            for (i, c) in pin.chars().enumerate() {
                screen.pin_input(i, &c.to_string(), &client, &self.scope).await;
            }
            if let ConvertStatus::Done(execution) = screen.status() {
                println!(
                    "Converted. Transaction {}",
                    execution.transaction_id.as_deref().unwrap_or("-")
                );
                return Ok(());
            }
            if let Some(message) = screen.pin().error() {
                println!("{}", message);
            }
        }
        bail!("conversion not completed")
    }
}

fn print_rows(rows: &[DisplayRow]) {
    let width = rows.iter().map(|row| row.label.len()).max().unwrap_or(0);
    for row in rows {
        println!("  {:<width$}  {}", row.label, row.value, width = width);
    }
}

fn list_bills(category: Option<&str>) -> anyhow::Result<()> {
    let wanted = match category {
        Some(raw) => Some(BillCategory::parse(raw).ok_or_else(|| anyhow!("unknown category: {}", raw))?),
        None => None,
    };
    for (category, billers) in by_category() {
        if wanted.is_some_and(|w| w != category) {
            continue;
        }
        println!("{}", category.display_name());
        for biller in billers {
            let fields: Vec<&str> = biller.fields.iter().map(|f| f.name).collect();
            println!(
                "  {:<16} {}  [{}]  ₦{}-₦{}",
                biller.id,
                biller.name,
                fields.join(", "),
                biller.min_amount,
                biller.max_amount
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    init_tracing(&config.logging);

    let (guard, scope) = ScreenScope::mount();
    let mut app = App {
        store: FileTokenStore::new(&config.session.token_file),
        config,
        scope,
        input: BufReader::new(tokio::io::stdin()).lines(),
    };

    tokio::select! {
        result = app.run(cli.cmd) => result,
        _ = shutdown_signal() => {
            guard.unmount();
            Ok(())
        }
    }
}
