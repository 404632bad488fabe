use std::time::Duration;

use directory_api::endpoints::{
    businesses::{Business, BusinessUpdate, NewBusiness},
    BusinessId,
};
use secrecy::SecretString;

use crate::session::AdminSession;
use crate::state::autocomplete::SuggestionField;
use crate::state::form::FormField;
use crate::suggestions::{engine::ScheduledPass, Candidate};

/// Commands to execute (user actions → state changes and background tasks)
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    SelectNext,
    SelectPrevious,
    NavigateToTop,
    NavigateToBottom,

    // Navigation
    NavigateBack,

    // Data loading
    LoadBusinesses,

    // Free-text search
    EnterSearchMode,
    ExitSearchMode,
    AppendSearchChar(char),
    DeleteSearchChar,
    ClearSearch,

    // Field-of-work dropdown
    OpenCategoryFilter,
    CloseCategoryFilter,
    BlurCategoryFilter,
    AppendCategoryChar(char),
    DeleteCategoryChar,
    MoveCategoryHighlight {
        up: bool,
    },
    HoverCategory {
        index: usize,
    },
    CommitCategory,
    CommitCategoryAt {
        index: usize,
    },

    // Business form
    OpenBusinessForm,
    EditBusiness {
        business_id: BusinessId,
    },
    CloseBusinessForm,
    NavigateFormField {
        forward: bool,
    },
    FocusFormField(FormField),
    AppendFormChar(char),
    DeleteFormChar,
    ClearFormField,
    MoveSuggestionHighlight {
        up: bool,
    },
    HoverSuggestion {
        field: SuggestionField,
        index: usize,
    },
    CommitSuggestion,
    CommitSuggestionAt {
        field: SuggestionField,
        index: usize,
    },
    CloseSuggestions {
        field: SuggestionField,
    },
    SubmitBusinessForm,

    // Admin
    OpenAdmin,
    AppendLoginChar(char),
    DeleteLoginChar,
    SwitchLoginField,
    SubmitLogin,
    Logout,
    InitiateDelete {
        business_id: BusinessId,
    },
    ConfirmDelete {
        business_id: BusinessId,
    },
    CancelDelete,

    // View toggles
    ToggleHelp,

    // Log screen
    NavigateToLogs,
    ScrollLogsUp,
    ScrollLogsDown,
    ScrollLogsPageUp,
    ScrollLogsPageDown,
    ScrollLogsToTop,
    ScrollLogsToBottom,

    // Key sequence state
    SetPendingKey(char),
    ClearPendingKey,

    // System
    Quit,
}

/// What a blur grace period was started for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurTarget {
    Suggestions(SuggestionField),
    CategoryFilter,
}

impl BlurTarget {
    pub fn task_key(self) -> &'static str {
        match self {
            Self::Suggestions(field) => field.blur_key(),
            Self::CategoryFilter => "blur-category-filter",
        }
    }
}

/// Events from background tasks (responses to commands)
#[derive(Debug, Clone)]
pub enum DataEvent {
    // Business collection
    BusinessesLoaded {
        businesses: Vec<Business>,
    },
    LoadError {
        error: String,
    },

    // Submission and admin edits
    BusinessCreated {
        business: Business,
    },
    BusinessCreateFailed {
        error: String,
    },
    BusinessUpdated {
        business: Business,
    },
    BusinessUpdateFailed {
        business_id: BusinessId,
        error: String,
    },
    BusinessDeleted {
        business_id: BusinessId,
    },
    BusinessDeleteFailed {
        business_id: BusinessId,
        error: String,
    },

    // Admin session
    LoggedIn {
        session: AdminSession,
    },
    LoginFailed {
        error: String,
    },
    SessionVerified {
        session: AdminSession,
    },
    SessionExpired,

    // Suggestions
    CityLookupStarted {
        generation: u64,
    },
    SuggestionsReady {
        field: SuggestionField,
        generation: u64,
        candidates: Vec<Candidate>,
        /// False when the pool could not be loaded; no "no results" state then.
        pool_loaded: bool,
    },
    /// Quiet period over for a pass that filters an in-memory pool.
    SuggestionPassDue {
        field: SuggestionField,
        generation: u64,
    },
    BlurGraceElapsed {
        target: BlurTarget,
        token: u64,
    },
}

/// Side effects requested by a state transition. Executed by
/// `commands::executor::execute_command`; recorded as-is in tests.
#[derive(Debug, Clone)]
pub enum Effect {
    LoadBusinesses,
    CreateBusiness {
        business: NewBusiness,
    },
    UpdateBusiness {
        token: SecretString,
        business_id: BusinessId,
        update: BusinessUpdate,
    },
    DeleteBusiness {
        token: SecretString,
        business_id: BusinessId,
    },
    Login {
        email: String,
        password: SecretString,
    },
    ClearSession,
    ScheduleSuggestionPass {
        field: SuggestionField,
        pass: ScheduledPass,
    },
    CancelSuggestionPass {
        field: SuggestionField,
    },
    ScheduleBlur {
        target: BlurTarget,
        token: u64,
        grace: Duration,
    },
}
