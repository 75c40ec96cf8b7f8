//! Wallet session and cached token state.
//!
//! [`SessionController`] sequences gateway calls: connect first, then load
//! token info, and only then accept transfer / burn / mint. The state it owns
//! is an immutable [`SessionState`] snapshot held in a `watch` channel and
//! replaced wholesale on every transition.

use std::fmt;

use chinchilla::{Address, ChainGateway, ChinchillaError, TokenInfo, TxReceipt};
use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::BankError;
use crate::notify::{Notification, NotificationSink, CONNECTED_DURATION, STATUS_DURATION};
use crate::validation::{validate_burn, validate_mint, validate_transfer, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Disconnected,
    Connecting,
    Connected,
}

/// A state-changing token operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Transfer,
    Burn,
    Mint,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transfer => write!(f, "transfer"),
            Self::Burn => write!(f, "burn"),
            Self::Mint => write!(f, "mint"),
        }
    }
}

/// Raw values from the input source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInputs {
    pub transfer_to: String,
    pub transfer_amount: Decimal,
    pub burn_amount: Decimal,
    pub mint_amount: Decimal,
}

/// Snapshot of everything the front-end shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub phase: Phase,
    /// Primary wallet account, set while connected.
    pub wallet: Option<Address>,
    /// Last successfully fetched token info.
    pub token: Option<TokenInfo>,
    pub inputs: FormInputs,
    /// Mutating operation currently awaiting the chain.
    pub in_flight: Option<Operation>,
    pub last_error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: Phase::Disconnected,
            wallet: None,
            token: None,
            inputs: FormInputs::default(),
            in_flight: None,
            last_error: None,
        }
    }
}

impl SessionState {
    pub fn is_wallet_connected(&self) -> bool {
        self.phase == Phase::Connected
    }

    /// Connected and token info loaded.
    pub fn info_ready(&self) -> bool {
        self.is_wallet_connected() && self.token.is_some()
    }

    /// Whether the connected wallet owns the token.
    ///
    /// Derived from the current wallet and token snapshot on every call.
    pub fn is_owner(&self) -> bool {
        match (self.wallet, &self.token) {
            (Some(wallet), Some(token)) => token.is_owned_by(wallet),
            _ => false,
        }
    }

    /// Explain why the session cannot take commands yet, if it cannot.
    pub fn ensure_ready(&self) -> Result<(), BankError> {
        if !self.is_wallet_connected() {
            return Err(BankError::NotConnected);
        }
        if self.token.is_none() {
            return Err(ValidationError::InfoNotReady.into());
        }
        Ok(())
    }

    pub fn total_supply(&self) -> Option<Decimal> {
        self.token.as_ref().map(|t| t.total_supply)
    }

    fn connected_wallet(&self) -> Option<Address> {
        self.wallet.filter(|_| self.is_wallet_connected())
    }

    // ---- transitions ----

    fn connecting(&self) -> Self {
        Self {
            phase: Phase::Connecting,
            ..self.clone()
        }
    }

    fn connected(&self, wallet: Address) -> Self {
        Self {
            phase: Phase::Connected,
            wallet: Some(wallet),
            token: None,
            last_error: None,
            ..self.clone()
        }
    }

    fn disconnected(&self) -> Self {
        Self {
            phase: Phase::Disconnected,
            wallet: None,
            token: None,
            ..self.clone()
        }
    }

    fn with_token(&self, wallet: Address, token: TokenInfo) -> Self {
        // Ignore results for a session that was replaced meanwhile.
        if self.connected_wallet() != Some(wallet) {
            return self.clone();
        }
        Self {
            token: Some(token),
            last_error: None,
            ..self.clone()
        }
    }

    fn without_token(&self) -> Self {
        Self {
            token: None,
            ..self.clone()
        }
    }

    fn with_error(&self, message: String) -> Self {
        Self {
            last_error: Some(message),
            ..self.clone()
        }
    }

    fn with_inputs(&self, inputs: FormInputs) -> Self {
        Self {
            inputs,
            ..self.clone()
        }
    }

    fn busy(&self, operation: Operation) -> Self {
        Self {
            in_flight: Some(operation),
            ..self.clone()
        }
    }

    fn idle(&self) -> Self {
        Self {
            in_flight: None,
            ..self.clone()
        }
    }

    fn transferred(&self) -> Self {
        Self {
            inputs: FormInputs {
                transfer_to: String::new(),
                transfer_amount: Decimal::ZERO,
                ..self.inputs.clone()
            },
            last_error: None,
            ..self.clone()
        }
    }

    fn supply_changed(&self, operation: Operation, total_supply: Decimal) -> Self {
        let mut inputs = self.inputs.clone();
        match operation {
            Operation::Burn => inputs.burn_amount = Decimal::ZERO,
            Operation::Mint => inputs.mint_amount = Decimal::ZERO,
            Operation::Transfer => {}
        }
        Self {
            token: self.token.as_ref().map(|t| TokenInfo {
                total_supply,
                ..t.clone()
            }),
            inputs,
            last_error: None,
            ..self.clone()
        }
    }
}

/// Releases the in-flight slot when dropped.
struct InFlight<'a> {
    state: &'a watch::Sender<SessionState>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.send_modify(|s| *s = s.idle());
    }
}

/// Owns the session snapshot and drives the gateway.
pub struct SessionController<G, N> {
    gateway: G,
    sink: N,
    state: watch::Sender<SessionState>,
}

impl<G: ChainGateway, N: NotificationSink> SessionController<G, N> {
    /// Create a controller in the `Disconnected` state without touching the wallet.
    pub fn new(gateway: G, sink: N) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            gateway,
            sink,
            state,
        }
    }

    /// Create a controller and immediately connect and load token info.
    ///
    /// Failures are reported through the sink and the snapshot; the controller
    /// is returned either way so the user can retry.
    pub async fn start(gateway: G, sink: N) -> Self {
        let controller = Self::new(gateway, sink);
        if let Err(e) = controller.initialize().await {
            debug!(error = %e, "session start incomplete");
        }
        controller
    }

    /// Current state snapshot.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receive every new snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    fn replace(&self, transition: impl FnOnce(&SessionState) -> SessionState) {
        self.state.send_modify(|s| *s = transition(s));
    }

    /// Record a failure, notify the user once, and hand the error back.
    fn fail(&self, err: BankError) -> BankError {
        let message = describe(&err);
        warn!(error = %err, "request failed");
        self.replace(|s| s.with_error(message.clone()));

        let notification = match &err {
            BankError::Validation(_) | BankError::OperationInProgress(_) => {
                Notification::warning(message)
            }
            _ => Notification::error(message),
        };
        self.sink.notify(notification);
        err
    }

    /// Connect, then load token info only if connecting succeeded.
    pub async fn initialize(&self) -> Result<(), BankError> {
        self.connect().await?;
        self.load_token_info().await?;
        Ok(())
    }

    /// Request wallet access.
    ///
    /// On failure the session returns to `Disconnected`.
    pub async fn connect(&self) -> Result<Address, BankError> {
        self.replace(SessionState::connecting);

        match self.gateway.connect().await {
            Ok(wallet) => {
                self.replace(|s| s.connected(wallet));
                info!(%wallet, "wallet connected");
                self.sink
                    .notify(Notification::info("Wallet connected!", CONNECTED_DURATION));
                Ok(wallet)
            }
            Err(e) => {
                self.replace(SessionState::disconnected);
                Err(self.fail(e.into()))
            }
        }
    }

    /// Fetch token info for the connected wallet.
    ///
    /// On failure the cached token info is left as it was.
    pub async fn load_token_info(&self) -> Result<TokenInfo, BankError> {
        let Some(wallet) = self.snapshot().connected_wallet() else {
            return Err(self.fail(BankError::NotConnected));
        };

        match self.gateway.fetch_token_info(wallet).await {
            Ok(snapshot) => {
                info!(
                    name = %snapshot.info.name,
                    symbol = %snapshot.info.symbol,
                    total_supply = %snapshot.info.total_supply,
                    is_owner = snapshot.is_owner,
                    "token info loaded"
                );
                self.replace(|s| s.with_token(wallet, snapshot.info.clone()));
                Ok(snapshot.info)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    // ---- input source ----

    fn update_inputs(&self, edit: impl FnOnce(&mut FormInputs)) {
        self.replace(|s| {
            let mut inputs = s.inputs.clone();
            edit(&mut inputs);
            s.with_inputs(inputs)
        });
    }

    pub fn set_transfer_destination(&self, destination: impl Into<String>) {
        let destination = destination.into();
        self.update_inputs(|i| i.transfer_to = destination);
    }

    pub fn set_transfer_amount(&self, amount: Decimal) {
        self.update_inputs(|i| i.transfer_amount = amount);
    }

    pub fn set_burn_amount(&self, amount: Decimal) {
        self.update_inputs(|i| i.burn_amount = amount);
    }

    pub fn set_mint_amount(&self, amount: Decimal) {
        self.update_inputs(|i| i.mint_amount = amount);
    }

    // ---- mutating operations ----

    /// Claim the single in-flight slot for `operation`.
    fn begin(&self, operation: Operation) -> Result<InFlight<'_>, BankError> {
        let mut running = None;
        self.state.send_if_modified(|s| match s.in_flight {
            Some(current) => {
                running = Some(current);
                false
            }
            None => {
                *s = s.busy(operation);
                true
            }
        });

        match running {
            Some(current) => Err(BankError::OperationInProgress(current)),
            None => Ok(InFlight { state: &self.state }),
        }
    }

    /// Apply the supply returned by a burn or mint and re-read the owner.
    ///
    /// The supply stays the gateway's value. If the re-read fails the token
    /// info is dropped so ownership must be reloaded before the next request.
    async fn settle_supply(&self, operation: Operation, total_supply: Decimal) {
        self.replace(|s| s.supply_changed(operation, total_supply));
        let Some(wallet) = self.snapshot().connected_wallet() else {
            return;
        };

        match self.gateway.fetch_token_info(wallet).await {
            Ok(snapshot) => {
                if !snapshot.is_owner {
                    warn!(owner = %snapshot.info.owner, %wallet, "token ownership moved");
                }
                let info = TokenInfo {
                    total_supply,
                    ..snapshot.info
                };
                self.replace(move |s| s.with_token(wallet, info));
            }
            Err(e) => {
                warn!(error = %e, "failed to re-read token owner, token info must be reloaded");
                self.replace(SessionState::without_token);
            }
        }
    }

    /// Transfer the entered amount to the entered destination.
    pub async fn request_transfer(&self) -> Result<TxReceipt, BankError> {
        let snapshot = self.snapshot();
        let (to, amount) = check_transfer(&snapshot).map_err(|e| self.fail(e.into()))?;
        let _slot = self.begin(Operation::Transfer).map_err(|e| self.fail(e))?;

        match self.gateway.transfer(amount, to).await {
            Ok(receipt) => {
                self.replace(SessionState::transferred);
                self.sink
                    .notify(Notification::info("Tokens transferred", STATUS_DURATION));
                Ok(receipt)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Burn the entered amount. Owner only.
    pub async fn request_burn(&self) -> Result<Decimal, BankError> {
        let snapshot = self.snapshot();
        let amount = check_burn(&snapshot).map_err(|e| self.fail(e.into()))?;
        let _slot = self.begin(Operation::Burn).map_err(|e| self.fail(e))?;

        match self.gateway.burn(amount).await {
            Ok(total_supply) => {
                self.settle_supply(Operation::Burn, total_supply).await;
                self.sink
                    .notify(Notification::info("Tokens burned", STATUS_DURATION));
                Ok(total_supply)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    /// Mint the entered amount to the owner. Owner only.
    pub async fn request_mint(&self) -> Result<Decimal, BankError> {
        let snapshot = self.snapshot();
        let amount = check_mint(&snapshot).map_err(|e| self.fail(e.into()))?;
        let _slot = self.begin(Operation::Mint).map_err(|e| self.fail(e))?;

        match self.gateway.mint(amount).await {
            Ok(total_supply) => {
                self.settle_supply(Operation::Mint, total_supply).await;
                self.sink
                    .notify(Notification::info("Tokens minted", STATUS_DURATION));
                Ok(total_supply)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }
}

fn ready(state: &SessionState) -> Result<&TokenInfo, ValidationError> {
    match &state.token {
        Some(token) if state.is_wallet_connected() => Ok(token),
        _ => Err(ValidationError::InfoNotReady),
    }
}

fn check_transfer(state: &SessionState) -> Result<(Address, Decimal), ValidationError> {
    ready(state)?;
    let inputs = &state.inputs;
    let to = validate_transfer(&inputs.transfer_to, inputs.transfer_amount)?;
    Ok((to, inputs.transfer_amount))
}

fn check_burn(state: &SessionState) -> Result<Decimal, ValidationError> {
    let token = ready(state)?;
    let amount = validate_burn(state.inputs.burn_amount, token.total_supply)?;
    if !state.is_owner() {
        return Err(ValidationError::NotOwner);
    }
    Ok(amount)
}

fn check_mint(state: &SessionState) -> Result<Decimal, ValidationError> {
    ready(state)?;
    let amount = validate_mint(state.inputs.mint_amount)?;
    if !state.is_owner() {
        return Err(ValidationError::NotOwner);
    }
    Ok(amount)
}

/// Human-readable text for a failure.
fn describe(err: &BankError) -> String {
    match err {
        BankError::Chain(ChinchillaError::ProviderMissing) => {
            "Please install a wallet to use the bank.".to_string()
        }
        BankError::Chain(ChinchillaError::UserRejected(_)) => {
            "Check if perhaps you dismissed the wallet connection popup.".to_string()
        }
        BankError::Validation(ValidationError::AboveTransferCeiling { ceiling, .. }) => {
            format!("Please fill in all fields and check the amount (at most {ceiling} per transfer).")
        }
        BankError::Validation(ValidationError::ExceedsSupply { .. }) => {
            "You have to set a proper amount to be burned (0 < amount <= total supply).".to_string()
        }
        other => {
            let mut text = other.to_string();
            if let Some(first) = text.get_mut(..1) {
                first.make_ascii_uppercase();
            }
            text
        }
    }
}
