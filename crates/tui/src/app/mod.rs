mod form;
mod ledger;

use std::{sync::Arc, time::Duration};

use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use engine::{DateFilter, EntryCollection, EntryStore, LedgerEntry, Subscription};
use suggest::{CategorySuggester, Suggestion};
use tokio::sync::mpsc;

use crate::{
    error::{AppError, Result},
    ui::{self, keymap::AppAction},
};

pub use form::{FormField, FormState, submit_error_message};
pub use ledger::LedgerView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Form(FormField),
    Table,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Self::Form(field) => {
                let index = FormField::ALL.iter().position(|f| *f == field).unwrap_or(0);
                FormField::ALL
                    .get(index + 1)
                    .map_or(Self::Table, |next| Self::Form(*next))
            }
            Self::Table => Self::Form(FormField::Date),
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Form(FormField::Date) => Self::Table,
            Self::Form(field) => {
                let index = FormField::ALL.iter().position(|f| *f == field).unwrap_or(1);
                Self::Form(FormField::ALL[index - 1])
            }
            Self::Table => Self::Form(FormField::Kind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastState {
    pub level: ToastLevel,
    pub message: String,
}

impl ToastState {
    fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub form: FormState,
    pub focus: Focus,
    pub ledger: LedgerView,
    /// Filter of the live subscription the table is showing.
    pub filter: DateFilter,
    pub suggestion: Suggestion,
    pub suggesting: bool,
    pub suggestions_enabled: bool,
    pub toast: Option<ToastState>,
}

/// Results of background work, handled on the event loop.
#[derive(Debug)]
pub enum AppEvent {
    Entries {
        generation: u64,
        entries: Vec<LedgerEntry>,
    },
    Suggestion(Suggestion),
}

pub struct App<C: EntryCollection, S: CategorySuggester> {
    store: EntryStore<C>,
    suggester: Option<Arc<S>>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    subscription: Option<Subscription>,
    /// Bumped on every resubscription so late updates of a released
    /// subscription are dropped.
    generation: u64,
    last_description: String,
    start_date: NaiveDate,
    pub state: AppState,
    should_quit: bool,
}

impl<C: EntryCollection, S: CategorySuggester> App<C, S> {
    /// Builds the controller and opens the subscription for `date`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(store: EntryStore<C>, suggester: Option<S>, date: NaiveDate) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let state = AppState {
            form: FormState::new(date),
            focus: Focus::Form(FormField::Description),
            ledger: LedgerView::default(),
            filter: DateFilter::On(date),
            suggestion: Suggestion::None,
            suggesting: false,
            suggestions_enabled: suggester.is_some(),
            toast: None,
        };

        let mut app = Self {
            store,
            suggester: suggester.map(Arc::new),
            events_tx,
            events_rx,
            subscription: None,
            generation: 0,
            last_description: String::new(),
            start_date: date,
            state,
            should_quit: false,
        };
        app.watch(DateFilter::On(date));
        app
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        self.release();
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            while let Ok(app_event) = self.events_rx.try_recv() {
                self.apply_event(app_event);
            }

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.handle_action(ui::keymap::map_key(key));
    }

    pub fn handle_action(&mut self, action: AppAction) {
        if action != AppAction::None {
            self.state.toast = None;
        }

        match (action, self.state.focus) {
            (AppAction::Quit, _) | (AppAction::Cancel, Focus::Table) => self.should_quit = true,
            (AppAction::Cancel, Focus::Form(_)) => self.state.focus = Focus::Table,
            (AppAction::NextField, focus) => self.state.focus = focus.next(),
            (AppAction::PrevField, focus) => self.state.focus = focus.prev(),
            (AppAction::Submit, Focus::Form(_)) => self.submit(),
            (AppAction::Submit, Focus::Table) => self.state.focus = Focus::Form(FormField::Date),
            (AppAction::Up, Focus::Table) => self.state.ledger.select_prev(),
            (AppAction::Down, Focus::Table) => self.state.ledger.select_next(),
            (AppAction::Up, focus) => self.state.focus = focus.prev(),
            (AppAction::Down, focus) => self.state.focus = focus.next(),
            (AppAction::Left | AppAction::Right, Focus::Form(FormField::Kind)) => {
                self.state.form.toggle_kind();
            }
            (AppAction::Left | AppAction::Right, _) => {}
            (AppAction::PrevDay, _) => self.shift_date(-1),
            (AppAction::NextDay, _) => self.shift_date(1),
            (AppAction::AcceptSuggestion, _) => self.accept_suggestion(),
            (AppAction::Delete, Focus::Table) | (AppAction::Input('d'), Focus::Table) => {
                self.delete_selected();
            }
            (AppAction::Delete, Focus::Form(_)) => {}
            (AppAction::Input('q'), Focus::Table) => self.should_quit = true,
            (AppAction::Input('j'), Focus::Table) => self.state.ledger.select_next(),
            (AppAction::Input('k'), Focus::Table) => self.state.ledger.select_prev(),
            (AppAction::Input(_), Focus::Table) => {}
            (AppAction::Input(ch), Focus::Form(field)) => {
                if self.state.form.input(field, ch) {
                    self.field_changed(field);
                }
            }
            (AppAction::Backspace, Focus::Form(field)) => {
                if self.state.form.backspace(field) {
                    self.field_changed(field);
                }
            }
            (AppAction::Backspace, Focus::Table) | (AppAction::None, _) => {}
        }
    }

    pub fn apply_event(&mut self, app_event: AppEvent) {
        match app_event {
            AppEvent::Entries {
                generation,
                entries,
            } => {
                if generation != self.generation {
                    tracing::debug!(generation, "dropping update of a released subscription");
                    return;
                }
                self.state.ledger.replace(entries);
            }
            AppEvent::Suggestion(suggestion) => {
                self.state.suggesting = false;
                self.state.suggestion = suggestion;
            }
        }
    }

    fn field_changed(&mut self, field: FormField) {
        match field {
            FormField::Date => self.date_changed(),
            FormField::Description => self.description_changed(),
            FormField::Category | FormField::Amount | FormField::Kind => {}
        }
    }

    fn shift_date(&mut self, days: i64) {
        let fallback = match self.state.filter {
            DateFilter::On(date) => date,
            DateFilter::All => self.start_date,
        };
        self.state.form.shift_date(days, fallback);
        self.date_changed();
    }

    /// Resubscribes for the date in the form. An empty date watches every
    /// entry; a date that does not parse yet keeps the current subscription.
    fn date_changed(&mut self) {
        let filter = if self.state.form.date.trim().is_empty() {
            DateFilter::All
        } else if let Some(date) = self.state.form.parsed_date() {
            DateFilter::On(date)
        } else {
            return;
        };

        if self.subscription.is_some() && filter == self.state.filter {
            return;
        }
        self.watch(filter);
    }

    fn watch(&mut self, filter: DateFilter) {
        if let Some(previous) = self.subscription.take() {
            previous.unsubscribe();
        }
        self.generation += 1;
        self.state.filter = filter;
        self.state.ledger.reset();

        let generation = self.generation;
        let events = self.events_tx.clone();
        let subscription = self.store.subscribe(filter, move |entries| {
            let _ = events.send(AppEvent::Entries {
                generation,
                entries,
            });
        });
        tracing::info!(?filter, "watching entries");
        self.subscription = Some(subscription);
    }

    /// Requests a suggestion for the current description, once per distinct
    /// value.
    fn description_changed(&mut self) {
        let description = self.state.form.description.clone();
        if description == self.last_description {
            return;
        }
        self.last_description.clone_from(&description);

        // Blank descriptions are rejected on submit too.
        if description.trim().is_empty() {
            self.state.suggestion = Suggestion::None;
            self.state.suggesting = false;
            return;
        }
        let Some(suggester) = self.suggester.clone() else {
            return;
        };

        self.state.suggesting = true;
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let suggestion = suggest::suggest_category(suggester.as_ref(), &description).await;
            let _ = events.send(AppEvent::Suggestion(suggestion));
        });
    }

    fn accept_suggestion(&mut self) {
        if let Some(category) = self.state.suggestion.category() {
            let category = category.to_string();
            self.state.form.accept_category(&category);
        }
    }

    fn submit(&mut self) {
        let entry = match self.state.form.to_new_entry() {
            Ok(entry) => entry,
            Err(err) => {
                self.state.toast = Some(ToastState::new(
                    ToastLevel::Error,
                    submit_error_message(&err),
                ));
                return;
            }
        };

        let store = self.store.clone();
        tokio::spawn(async move {
            if let Err(err) = store.create(&entry).await {
                tracing::error!("failed to add entry: {err}");
            }
        });

        self.state.form.clear_after_submit();
        self.state.suggestion = Suggestion::None;
        self.state.suggesting = false;
        self.last_description.clear();
        self.state.toast = Some(ToastState::new(ToastLevel::Success, "Entry added"));
    }

    fn delete_selected(&mut self) {
        let Some(entry) = self.state.ledger.selected_entry() else {
            return;
        };
        let id = entry.id.clone();
        self.state.toast = Some(ToastState::new(
            ToastLevel::Info,
            format!("Deleting {}", entry.description),
        ));

        let store = self.store.clone();
        tokio::spawn(async move {
            if let Err(err) = store.delete(&id).await {
                tracing::error!(%id, "failed to delete entry: {err}");
            }
        });
    }

    /// Releases the live subscription.
    pub fn release(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use api_types::{
        entry::{Amount, EntryDocument},
        suggest::{SuggestCategoryInput, SuggestCategoryOutput},
    };
    use engine::{EntryKind, MemoryCollection, MoneyCents};
    use suggest::SuggestError;

    use super::*;

    #[derive(Clone, Default)]
    struct FakeSuggester {
        calls: Arc<Mutex<Vec<String>>>,
        failures: Arc<AtomicUsize>,
    }

    impl FakeSuggester {
        fn failing() -> Self {
            let fake = Self::default();
            fake.failures.store(usize::MAX, Ordering::SeqCst);
            fake
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CategorySuggester for FakeSuggester {
        async fn suggest(
            &self,
            input: SuggestCategoryInput,
        ) -> std::result::Result<SuggestCategoryOutput, SuggestError> {
            self.calls.lock().unwrap().push(input.description.clone());
            if self.failures.load(Ordering::SeqCst) > 0 {
                return Err(SuggestError::EmptyResponse);
            }
            Ok(SuggestCategoryOutput {
                category: format!("cat:{}", input.description),
            })
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    fn doc(date: &str, description: &str, category: &str, amount: f64) -> EntryDocument {
        EntryDocument {
            date: date.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            amount: Amount::Number(amount),
            kind: None,
        }
    }

    fn store() -> EntryStore<MemoryCollection> {
        EntryStore::new(Arc::new(MemoryCollection::with_documents([
            doc("2024-08-01", "Salary", "Income", 5000.0),
            doc("2024-08-15", "Rent", "Housing", 2000.0),
            doc("2024-08-15", "Groceries", "Food", 500.0),
            doc("2024-08-01", "Dividends", "Income", 7000.0),
        ])))
    }

    fn app(suggester: Option<FakeSuggester>) -> App<MemoryCollection, FakeSuggester> {
        App::new(store(), suggester, day(15))
    }

    async fn next_event(app: &mut App<MemoryCollection, FakeSuggester>) {
        let app_event = tokio::time::timeout(Duration::from_secs(2), app.events_rx.recv())
            .await
            .expect("no event arrived")
            .expect("event channel closed");
        app.apply_event(app_event);
    }

    async fn wait_until<F>(app: &mut App<MemoryCollection, FakeSuggester>, done: F)
    where
        F: Fn(&AppState) -> bool,
    {
        while !done(&app.state) {
            next_event(app).await;
        }
    }

    fn type_text(app: &mut App<MemoryCollection, FakeSuggester>, field: FormField, text: &str) {
        app.state.focus = Focus::Form(field);
        for ch in text.chars() {
            app.handle_action(AppAction::Input(ch));
        }
    }

    fn clear_field(app: &mut App<MemoryCollection, FakeSuggester>, field: FormField) {
        app.state.focus = Focus::Form(field);
        while !app.state.form.value(field).is_empty() {
            app.handle_action(AppAction::Backspace);
        }
    }

    #[tokio::test]
    async fn opens_on_the_start_day_with_totals() {
        let mut app = app(None);
        wait_until(&mut app, |state| state.ledger.loaded).await;

        let descriptions: Vec<&str> = app
            .state
            .ledger
            .entries
            .iter()
            .map(|e| e.description.as_str())
            .collect();
        assert_eq!(descriptions, ["Rent", "Groceries"]);
        assert_eq!(app.state.ledger.summary.total_income, MoneyCents::ZERO);
        assert_eq!(
            app.state.ledger.summary.total_expenses,
            MoneyCents::new(250_000)
        );
    }

    #[tokio::test]
    async fn incomplete_submission_alerts_and_creates_nothing() {
        let mut app = app(None);
        type_text(&mut app, FormField::Description, "Coffee");
        type_text(&mut app, FormField::Amount, "3");
        app.handle_action(AppAction::Submit);

        let toast = app.state.toast.clone().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.message, "Please fill in all fields");
        assert_eq!(app.state.form.description, "Coffee");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(app.store.collection().len(), 4);
    }

    #[tokio::test]
    async fn unparseable_amount_is_rejected() {
        let mut app = app(None);
        type_text(&mut app, FormField::Description, "Coffee");
        type_text(&mut app, FormField::Category, "Food");
        type_text(&mut app, FormField::Amount, "1.2.3");
        app.handle_action(AppAction::Submit);

        assert_eq!(app.state.toast.as_ref().unwrap().message, "Invalid amount");
        assert_eq!(app.store.collection().len(), 4);
    }

    #[tokio::test]
    async fn submission_creates_entry_and_clears_form() {
        let mut app = app(None);
        wait_until(&mut app, |state| state.ledger.loaded).await;

        type_text(&mut app, FormField::Description, "Bonus");
        type_text(&mut app, FormField::Category, "Salary");
        type_text(&mut app, FormField::Amount, "250,50");
        type_text(&mut app, FormField::Kind, " ");
        app.handle_action(AppAction::Submit);

        assert!(app.state.form.description.is_empty());
        assert!(app.state.form.category.is_empty());
        assert!(app.state.form.amount.is_empty());
        assert_eq!(app.state.form.date, "2024-08-15");
        assert_eq!(app.state.form.kind, EntryKind::Income);

        wait_until(&mut app, |state| state.ledger.entries.len() == 3).await;
        assert_eq!(
            app.state.ledger.summary.total_income,
            MoneyCents::new(25_050)
        );
        assert_eq!(app.state.ledger.summary.balance(), MoneyCents::new(-224_950));
    }

    #[tokio::test]
    async fn suggester_runs_once_per_distinct_description() {
        let suggester = FakeSuggester::default();
        let mut app = app(Some(suggester.clone()));

        app.state.form.description = "Groceries".to_string();
        app.description_changed();
        app.description_changed();
        assert!(app.state.suggesting);

        wait_until(&mut app, |state| !state.suggesting).await;
        assert_eq!(suggester.calls(), ["Groceries"]);
        assert_eq!(app.state.suggestion.label(), Some("cat:Groceries"));

        app.handle_action(AppAction::AcceptSuggestion);
        assert_eq!(app.state.form.category, "cat:Groceries");
    }

    #[tokio::test]
    async fn emptied_description_clears_suggestion_without_request() {
        let suggester = FakeSuggester::default();
        let mut app = app(Some(suggester.clone()));

        type_text(&mut app, FormField::Description, "x");
        wait_until(&mut app, |state| !state.suggesting).await;
        assert_eq!(app.state.suggestion.category(), Some("cat:x"));

        app.handle_action(AppAction::Backspace);
        assert_eq!(app.state.suggestion, Suggestion::None);
        assert!(!app.state.suggesting);
        assert_eq!(suggester.calls(), ["x"]);
    }

    #[tokio::test]
    async fn blank_description_is_never_sent() {
        let suggester = FakeSuggester::default();
        let mut app = app(Some(suggester.clone()));

        type_text(&mut app, FormField::Description, "   ");
        assert!(!app.state.suggesting);
        assert_eq!(app.state.suggestion, Suggestion::None);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(suggester.calls().is_empty());

        type_text(&mut app, FormField::Category, "Food");
        type_text(&mut app, FormField::Amount, "5");
        app.handle_action(AppAction::Submit);
        assert_eq!(
            app.state.toast.as_ref().unwrap().message,
            "Please fill in all fields"
        );
    }

    #[tokio::test]
    async fn failed_suggestion_shows_placeholder() {
        let mut app = app(Some(FakeSuggester::failing()));
        type_text(&mut app, FormField::Description, "?");
        wait_until(&mut app, |state| !state.suggesting).await;

        assert_eq!(app.state.suggestion, Suggestion::Failed);
        assert_eq!(app.state.suggestion.label(), Some("Error suggesting category"));

        app.handle_action(AppAction::AcceptSuggestion);
        assert!(app.state.form.category.is_empty());
    }

    #[tokio::test]
    async fn without_suggester_nothing_is_requested() {
        let mut app = app(None);
        type_text(&mut app, FormField::Description, "Rent");
        assert!(!app.state.suggesting);
        assert_eq!(app.state.suggestion, Suggestion::None);
    }

    #[tokio::test]
    async fn date_change_refilters_entries() {
        let mut app = app(None);
        wait_until(&mut app, |state| state.ledger.loaded).await;

        clear_field(&mut app, FormField::Date);
        assert_eq!(app.state.filter, DateFilter::All);
        wait_until(&mut app, |state| state.ledger.loaded).await;
        assert_eq!(app.state.ledger.entries.len(), 4);

        type_text(&mut app, FormField::Date, "2024-08-0");
        assert_eq!(app.state.filter, DateFilter::All);
        type_text(&mut app, FormField::Date, "1");
        assert_eq!(app.state.filter, DateFilter::On(day(1)));

        wait_until(&mut app, |state| state.ledger.loaded).await;
        assert!(app.state.ledger.entries.iter().all(|e| e.date == day(1)));
        assert_eq!(app.state.ledger.entries.len(), 2);
        assert!(
            app.state
                .ledger
                .entries
                .iter()
                .all(|e| e.kind == EntryKind::Income)
        );
    }

    #[tokio::test]
    async fn day_navigation_moves_the_subscription() {
        let mut app = app(None);
        app.handle_action(AppAction::NextDay);
        assert_eq!(app.state.form.date, "2024-08-16");
        assert_eq!(app.state.filter, DateFilter::On(day(16)));

        wait_until(&mut app, |state| state.ledger.loaded).await;
        assert!(app.state.ledger.entries.is_empty());
    }

    #[tokio::test]
    async fn updates_of_released_subscription_are_ignored() {
        let mut app = app(None);
        let stale = app.generation;
        app.handle_action(AppAction::PrevDay);

        app.apply_event(AppEvent::Entries {
            generation: stale,
            entries: Vec::new(),
        });
        assert!(!app.state.ledger.loaded);
    }

    #[tokio::test]
    async fn delete_removes_selected_row() {
        let mut app = app(None);
        wait_until(&mut app, |state| state.ledger.loaded).await;

        app.state.focus = Focus::Table;
        app.handle_action(AppAction::Down);
        let target = app.state.ledger.selected_entry().unwrap().id.clone();
        app.handle_action(AppAction::Input('d'));

        wait_until(&mut app, |state| state.ledger.entries.len() == 1).await;
        assert!(app.state.ledger.entries.iter().all(|e| e.id != target));
        assert_eq!(app.store.collection().len(), 3);
    }

    #[tokio::test]
    async fn quit_keys_depend_on_focus() {
        let mut app = app(None);
        type_text(&mut app, FormField::Description, "q");
        assert!(!app.should_quit);
        assert_eq!(app.state.form.description, "q");

        app.handle_action(AppAction::Cancel);
        assert_eq!(app.state.focus, Focus::Table);
        app.handle_action(AppAction::Input('q'));
        assert!(app.should_quit);
    }
}
