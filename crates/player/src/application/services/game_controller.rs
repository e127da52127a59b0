//! Game controller - the client's single state container
//!
//! Owns the live `SessionState` and drives the screen controller, the sync
//! service and the action dispatcher. Every public operation reports its
//! failure as a notice on the overlay before returning the error, so a
//! caller may ignore the `Result` without losing anything the player
//! should see.

use std::sync::Arc;

use echoverse_domain::{
    Character, DisplayName, DomainError, GameMode, PlayerIdentity, Screen, SessionState, UserId,
};
use futures_channel::mpsc;

use super::action_dispatcher::{ActionDispatcher, ActionPanel, ActionPhase, PendingAction};
use super::bonus_code::BonusCodeTracker;
use super::screen_controller::{ScreenController, ScreenTicket};
use super::single_flight::SingleFlight;
use super::sync_service::{merge_document, SyncService};
use crate::application::dto::{CharacterForm, ClientEvent, NameField, Notice, RemoteChange};
use crate::application::error::{ClientError, Operation};
use crate::ports::outbound::{
    ClockPort, DocumentStorePort, IdentityPort, NarrationError, NarrationPort, NarrationRequest,
    NarrationResponse, Subscription,
};

const ANONYMOUS_NOTICE: &str = "You are playing anonymously. \
     Choose a display name at login before starting the adventure.";

/// Everything the controller needs from the outside world.
pub struct ControllerDeps {
    pub identity: Arc<dyn IdentityPort>,
    pub store: Arc<dyn DocumentStorePort>,
    pub narration: Arc<dyn NarrationPort>,
    pub clock: Arc<dyn ClockPort>,
    /// Namespace segment of every document path.
    pub app_id: String,
    pub initial_auth_token: Option<String>,
}

pub struct GameController {
    identity: Arc<dyn IdentityPort>,
    clock: Arc<dyn ClockPort>,
    sync: SyncService,
    actions: ActionDispatcher,
    screens: ScreenController,
    bonus: BonusCodeTracker,
    auth_flight: SingleFlight,
    state: SessionState,
    name_field: NameField,
    initial_auth_token: Option<String>,
    events: Option<mpsc::UnboundedSender<ClientEvent>>,
    subscription: Option<Subscription>,
    revision: u64,
}

impl GameController {
    pub fn new(deps: ControllerDeps) -> Self {
        let ControllerDeps {
            identity,
            store,
            narration,
            clock,
            app_id,
            initial_auth_token,
        } = deps;

        Self {
            identity,
            clock,
            sync: SyncService::new(store, app_id),
            actions: ActionDispatcher::new(narration),
            screens: ScreenController::new(),
            bonus: BonusCodeTracker::new(),
            auth_flight: SingleFlight::new(),
            state: SessionState::default(),
            name_field: NameField::open(),
            initial_auth_token,
            events: None,
            subscription: None,
            revision: 0,
        }
    }

    // =========================================================================
    // Read side
    // =========================================================================

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.screens.current()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.screens.notice()
    }

    pub fn panel(&self) -> &ActionPanel {
        self.actions.panel()
    }

    pub fn action_phase(&self) -> ActionPhase {
        self.actions.phase()
    }

    pub fn last_action_outcome(&self) -> Option<ActionPhase> {
        self.actions.last_outcome()
    }

    pub fn controls_enabled(&self) -> bool {
        self.actions.controls_enabled()
    }

    pub fn is_loading(&self) -> bool {
        self.actions.is_loading()
    }

    /// Save is unavailable while a save or a narration request is running.
    pub fn can_save(&self) -> bool {
        self.actions.controls_enabled() && !self.sync.is_saving()
    }

    pub fn character_name_field(&self) -> &NameField {
        &self.name_field
    }

    /// Bumped on every visible change. A view re-renders when it differs
    /// from the value it last drew.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Route identity changes (and, once signed in, session document pushes)
    /// into the returned channel. Feed each item to [`Self::handle_event`].
    pub fn connect_events(&mut self) -> mpsc::UnboundedReceiver<ClientEvent> {
        let (tx, rx) = mpsc::unbounded();
        let auth_tx = tx.clone();
        self.identity.on_auth_state_change(Box::new(move |user| {
            let _ = auth_tx.unbounded_send(ClientEvent::AuthChanged(user));
        }));
        self.events = Some(tx);
        rx
    }

    pub async fn handle_event(&mut self, event: ClientEvent) -> Result<(), ClientError> {
        match event {
            ClientEvent::AuthChanged(user) => {
                if user != self.identity.current_user() {
                    tracing::debug!(user = ?user, "Ignoring superseded auth event");
                    return Ok(());
                }
                self.handle_auth_change(user).await
            }
            ClientEvent::Remote(change) => {
                self.apply_remote_change(change);
                Ok(())
            }
        }
    }

    /// React to the identity provider's current user.
    ///
    /// A new identity loads the profile: with a recorded display name the
    /// saved session is restored, without one the player goes straight to
    /// character creation. `None` drops everything and returns to Login.
    pub async fn handle_auth_change(&mut self, user: Option<UserId>) -> Result<(), ClientError> {
        let Some(user_id) = user else {
            if self.state.identity.is_some() {
                tracing::info!("Identity lost");
                self.clear_session();
            }
            self.go(Screen::Login);
            return Ok(());
        };

        if self.state.user_id() == Some(&user_id) {
            tracing::debug!(user_id = %user_id, "Identity unchanged");
            return Ok(());
        }
        if self.state.identity.is_some() {
            self.clear_session();
        }

        tracing::info!(user_id = %user_id, "Identity established");
        self.state.identity = Some(PlayerIdentity::new(user_id.clone()));
        self.touch();

        let display_name = match self.sync.load_profile(&user_id).await {
            Ok(name) => name,
            Err(e) => {
                self.go(Screen::Login);
                return self.report(e);
            }
        };

        match display_name {
            Some(name) => {
                self.adopt_display_name(name);
                self.restore_session().await?;
            }
            None => {
                self.name_field = NameField::open();
                self.go(Screen::CharacterCreation);
            }
        }
        self.watch_session(&user_id);
        Ok(())
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Sign in with the configured bootstrap token, if any. Without one the
    /// client waits at Login.
    pub async fn bootstrap(&mut self) -> Result<(), ClientError> {
        let Some(token) = self.initial_auth_token.clone() else {
            tracing::info!("No bootstrap token, waiting at login");
            return Ok(());
        };

        match self.sign_in_with_token(&token).await {
            Ok(user_id) => self.handle_auth_change(Some(user_id)).await,
            Err(e) => self.report(e),
        }
    }

    /// Record a display name, signing in anonymously first if needed.
    ///
    /// Input is validated before any network call.
    pub async fn create_user(&mut self, raw_name: &str) -> Result<(), ClientError> {
        if !self.on_screen(Screen::Login, "create_user") {
            return Ok(());
        }
        let name = match DisplayName::new(raw_name) {
            Ok(name) => name,
            Err(e) => return self.report(e.into()),
        };

        let user_id = match self.state.user_id().cloned() {
            Some(user_id) => user_id,
            None => match self.sign_in_anonymous().await {
                Ok(user_id) => {
                    self.state.identity = Some(PlayerIdentity::new(user_id.clone()));
                    self.watch_session(&user_id);
                    user_id
                }
                Err(e) => return self.report(e),
            },
        };

        let now = self.clock.now();
        if let Err(e) = self.sync.save_display_name(&user_id, &name, now).await {
            return self.report(e);
        }

        self.adopt_display_name(name.clone());
        self.screens
            .show_notice(Notice::success(format!("Welcome, {name}!")));
        self.go(Screen::CharacterCreation);
        Ok(())
    }

    /// Sign in without a display name. A character can be created and
    /// saved, but the adventure starts only once a display name is chosen.
    pub async fn continue_anonymously(&mut self) -> Result<(), ClientError> {
        if !self.on_screen(Screen::Login, "continue_anonymously") {
            return Ok(());
        }
        let user_id = match self.sign_in_anonymous().await {
            Ok(user_id) => user_id,
            Err(e) => return self.report(e),
        };
        self.screens.show_notice(Notice::info(ANONYMOUS_NOTICE));
        self.handle_auth_change(Some(user_id)).await
    }

    pub async fn sign_out(&mut self) -> Result<(), ClientError> {
        if let Err(e) = self.identity.sign_out().await {
            return self.report(e.into());
        }
        self.clear_session();
        self.screens.show_notice(Notice::info("Signed out."));
        self.touch();
        Ok(())
    }

    /// Leaving the game signs out.
    pub async fn quit(&mut self) -> Result<(), ClientError> {
        self.sign_out().await
    }

    // =========================================================================
    // Character creation and mode selection
    // =========================================================================

    pub async fn save_character(&mut self, form: CharacterForm) -> Result<(), ClientError> {
        if !self.on_screen(Screen::CharacterCreation, "save_character") {
            return Ok(());
        }
        let Some(identity) = self.state.identity.clone() else {
            return self.require_login();
        };

        let name = self.name_field.resolve(&form.name).to_string();
        let character = match Character::create(
            &name,
            &form.archetype,
            &form.description,
            &form.background,
            self.clock.now(),
        ) {
            Ok(character) => character,
            Err(e) => return self.report(e.into()),
        };

        let fresh = SessionState::for_character(Some(identity), character);
        if let Err(e) = self.sync.persist(&fresh).await {
            return self.report(e);
        }

        tracing::info!(character = %name, "Character created");
        self.state = fresh;
        self.actions.reset();
        self.screens
            .show_notice(Notice::success("Character saved. Choose how to play."));
        self.go(Screen::ModeSelection);
        Ok(())
    }

    /// Pick the game mode and request the opening narration.
    pub async fn start_game(&mut self, raw_mode: &str) -> Result<(), ClientError> {
        if !self.on_screen(Screen::ModeSelection, "start_game") {
            return Ok(());
        }
        let mode: GameMode = match raw_mode.parse() {
            Ok(mode) => mode,
            Err(e) => return self.report(ClientError::Validation(e)),
        };
        let Some(character) = self.state.character.clone() else {
            self.go(Screen::CharacterCreation);
            return self.report(ClientError::NotFound);
        };

        self.state.mode = Some(mode);
        self.touch();
        let prompt = opening_prompt(&character, mode);
        self.dispatch(&prompt, true).await
    }

    // =========================================================================
    // Game
    // =========================================================================

    pub async fn take_action(&mut self, text: &str) -> Result<(), ClientError> {
        if !self.on_screen(Screen::Game, "take_action") {
            return Ok(());
        }
        let text = text.trim();
        if text.is_empty() {
            return self.report(ClientError::Validation(
                DomainError::validation("Describe what you want to do."),
            ));
        }
        self.dispatch(text, false).await
    }

    /// Dispatch the canned choice at `index` (zero-based).
    pub async fn choose_option(&mut self, index: usize) -> Result<(), ClientError> {
        if !self.on_screen(Screen::Game, "choose_option") {
            return Ok(());
        }
        let Some(option) = self.actions.option(index).map(str::to_string) else {
            return self.report(ClientError::Validation(
                DomainError::validation("That choice is not available."),
            ));
        };
        self.dispatch(&option, false).await
    }

    /// Send one action to the narration service and apply the answer.
    ///
    /// Requires an identity with a display name; without one no request is
    /// made and the player is sent to Login. On failure the session state is
    /// exactly what it was before the call.
    pub async fn dispatch(&mut self, action: &str, is_initial: bool) -> Result<(), ClientError> {
        let Some(identity) = self.state.identity.clone() else {
            return self.require_login();
        };
        if identity.display_name.is_none() {
            return self.require_login();
        }

        let pending = match self.actions.begin(action, is_initial) {
            Ok(pending) => pending,
            Err(e) => return self.report(e),
        };
        let snapshot = self.state.clone();
        if !is_initial {
            self.state.record_player_action(action);
        }
        self.touch();

        let Some(request) = NarrationRequest::for_turn(&identity, &self.state, action, is_initial)
        else {
            self.actions.fail(&pending);
            self.actions.settle();
            self.state = snapshot;
            return self.require_login();
        };

        let ticket = self.screens.ticket();
        let result = self.actions.send(request).await;
        self.finish_dispatch(pending, ticket, snapshot, result).await
    }

    /// Apply the outcome of one narration request.
    ///
    /// A result for a request that was abandoned, or that was sent from a
    /// screen no longer showing, is dropped without touching state: whatever
    /// superseded it has already replaced the session.
    async fn finish_dispatch(
        &mut self,
        pending: PendingAction,
        ticket: ScreenTicket,
        snapshot: SessionState,
        result: Result<NarrationResponse, NarrationError>,
    ) -> Result<(), ClientError> {
        if !self.actions.is_in_flight(&pending) || !self.screens.is_current(&ticket) {
            tracing::debug!(
                sequence = pending.sequence,
                screen = ?ticket.screen(),
                "Dropping superseded narration result"
            );
            if self.actions.fail(&pending) {
                self.actions.settle();
                self.touch();
            }
            return Ok(());
        }

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                self.actions.fail(&pending);
                self.actions.settle();
                self.state = snapshot;
                let err = ClientError::from(e);
                if err.is_not_found() {
                    self.go(Screen::CharacterCreation);
                }
                return self.report(err);
            }
        };

        self.actions.complete(&pending, &response.options);
        if let Some(confirmed) = response.new_state {
            self.state.adopt(confirmed);
        }
        self.state.record_narration(&response.narration);
        self.actions.settle();
        tracing::info!(
            sequence = pending.sequence,
            options = response.options.len(),
            "Narration applied"
        );
        if pending.is_initial {
            self.go(Screen::Game);
        }
        self.touch();

        if let Err(e) = self.sync.persist(&self.state).await {
            tracing::warn!(error = %e, "Could not save after narration");
            self.screens.show_notice(e.notice());
            self.touch();
        }
        Ok(())
    }

    /// Explicit save from the game screen.
    pub async fn save_game(&mut self) -> Result<(), ClientError> {
        if !self.on_screen(Screen::Game, "save_game") {
            return Ok(());
        }
        if self.state.identity.is_none() {
            return self.require_login();
        }
        if !self.actions.controls_enabled() {
            return self.report(ClientError::Busy(Operation::Narration));
        }
        match self.sync.persist(&self.state).await {
            Ok(()) => {
                self.screens.show_notice(Notice::success("Game saved."));
                self.touch();
                Ok(())
            }
            Err(e) => self.report(e),
        }
    }

    /// Drop the current adventure and start character creation again.
    pub fn new_adventure(&mut self) {
        if !self.on_screen(Screen::Game, "new_adventure") {
            return;
        }
        tracing::info!("Starting a new adventure");
        self.state.reset();
        self.actions.reset();
        self.bonus.clear();
        self.reset_name_field();
        self.screens
            .show_notice(Notice::info("A new adventure begins. Create your character."));
        self.go(Screen::CharacterCreation);
        self.touch();
    }

    /// Feed one key press to the bonus code detector.
    pub fn handle_key(&mut self, code: &str) {
        if !self.bonus.push(code) {
            return;
        }
        if !self.state.has_session() {
            tracing::debug!("Bonus code entered without a session");
            return;
        }
        self.state.apply_bonus();
        tracing::info!("Bonus code applied");
        self.screens
            .show_notice(Notice::success("Bonus code activated: your attributes were boosted!"));
        self.touch();
    }

    /// Merge a pushed session document into local state (remote wins).
    ///
    /// Ignored on Login and CharacterCreation so a half-filled form is never
    /// overwritten.
    pub fn apply_remote_change(&mut self, change: RemoteChange) {
        let screen = self.screens.current();
        if screen.holds_form() {
            tracing::debug!(screen = ?screen, "Ignoring remote change while a form is open");
            return;
        }
        match change {
            RemoteChange::Updated(document) => match merge_document(&self.state, &document) {
                Ok(merged) => {
                    if merged != self.state {
                        tracing::debug!("Applied remote session change");
                        self.state = merged;
                        self.touch();
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Rejected remote session change");
                    self.screens.show_notice(e.notice());
                    self.touch();
                }
            },
            RemoteChange::Removed => {
                tracing::debug!("Session document removed remotely; keeping local state");
            }
            RemoteChange::Failed(e) => {
                let err = ClientError::from(e);
                tracing::warn!(error = %err, "Session subscription failed");
                self.screens.show_notice(err.notice());
                self.touch();
            }
        }
    }

    pub fn dismiss_notice(&mut self) {
        if self.screens.dismiss_notice().is_some() {
            self.touch();
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn sign_in_anonymous(&self) -> Result<UserId, ClientError> {
        let Some(_guard) = self.auth_flight.try_acquire() else {
            return Err(ClientError::Busy(Operation::Auth));
        };
        Ok(self.identity.sign_in_anonymous().await?)
    }

    async fn sign_in_with_token(&self, token: &str) -> Result<UserId, ClientError> {
        let Some(_guard) = self.auth_flight.try_acquire() else {
            return Err(ClientError::Busy(Operation::Auth));
        };
        Ok(self.identity.sign_in_with_token(token).await?)
    }

    async fn restore_session(&mut self) -> Result<(), ClientError> {
        let Some(identity) = self.state.identity.clone() else {
            return self.require_login();
        };
        match self.sync.hydrate(&identity).await {
            Ok(Some(restored)) => {
                let target = restore_target(&restored);
                self.state = restored;
                self.actions.reset();
                if target == Screen::Game {
                    self.screens
                        .show_notice(Notice::info("Welcome back! Your adventure continues."));
                }
                self.go(target);
                self.touch();
                Ok(())
            }
            Ok(None) => {
                self.go(Screen::CharacterCreation);
                Ok(())
            }
            Err(e) => {
                self.go(Screen::Login);
                self.report(e)
            }
        }
    }

    fn adopt_display_name(&mut self, name: DisplayName) {
        self.name_field = NameField::locked(name.as_str());
        if let Some(identity) = self.state.identity.as_mut() {
            identity.display_name = Some(name);
        }
        self.touch();
    }

    fn reset_name_field(&mut self) {
        self.name_field = match self.state.display_name() {
            Some(name) => NameField::locked(name.as_str()),
            None => NameField::open(),
        };
    }

    fn watch_session(&mut self, user_id: &UserId) {
        let Some(events) = self.events.clone() else {
            return;
        };
        self.subscription = Some(self.sync.subscribe(user_id, move |change| {
            let _ = events.unbounded_send(ClientEvent::Remote(change));
        }));
    }

    fn clear_session(&mut self) {
        self.subscription = None;
        self.state = SessionState::default();
        self.actions.reset();
        self.bonus.clear();
        self.name_field = NameField::open();
        self.go(Screen::Login);
        self.touch();
    }

    fn require_login<T>(&mut self) -> Result<T, ClientError> {
        self.go(Screen::Login);
        self.report(ClientError::Unauthenticated)
    }

    /// No-op guard for handlers bound to a screen that is no longer shown.
    fn on_screen(&self, expected: Screen, operation: &'static str) -> bool {
        let current = self.screens.current();
        if current != expected {
            tracing::debug!(operation, screen = ?current, "Ignoring input for another screen");
            return false;
        }
        true
    }

    fn go(&mut self, screen: Screen) {
        match self.screens.transition(screen) {
            Ok(()) => self.touch(),
            Err(e) => tracing::warn!(error = %e, "Screen change refused"),
        }
    }

    fn report<T>(&mut self, err: ClientError) -> Result<T, ClientError> {
        tracing::warn!(error = %err, "Operation failed");
        self.screens.show_notice(err.notice());
        self.touch();
        Err(err)
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

/// Which screen a restored session resumes on.
fn restore_target(state: &SessionState) -> Screen {
    match (&state.character, state.mode) {
        (Some(_), Some(_)) => Screen::Game,
        (Some(_), None) => Screen::ModeSelection,
        (None, _) => Screen::CharacterCreation,
    }
}

/// Action text for the opening narration request.
fn opening_prompt(character: &Character, mode: GameMode) -> String {
    format!(
        "Démarrer l'aventure en tant que {} : \"{}\", avec un passé \"{}\" en mode {}",
        character.archetype(),
        character.description(),
        character.background(),
        mode
    )
}
