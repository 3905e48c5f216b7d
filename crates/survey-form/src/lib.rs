pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod home;
pub mod modal;
pub mod navigation;
pub mod runtime;

pub use api::{MemoryApi, SurveyApi};
pub use config::{DEFAULT_USERNAME, FormConfig};
pub use error::{ApiError, ConfigError, FormError};
pub use form::{ActiveForm, Effect, FormState, Message, Phase, RequestId, Stage, SurveyForm};
pub use home::{HomeState, HomeView, SurveyCard};
pub use modal::{ModalAction, ModalKind, ModalProps, Warning};
pub use navigation::{Navigator, RecordingNavigator, Route};
pub use runtime::FormRuntime;
