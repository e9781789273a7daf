use shiori_api::kitsu::KitsuError;
use shiori_core::ShioriError;
use thiserror::Error;

const TOKEN_REJECTED: &str = "the stored token was rejected; run `shiori login` again";

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] ShioriError),

    #[error("Kitsu: {0}")]
    Kitsu(#[from] KitsuError),

    #[error("not logged in to Kitsu")]
    NotLoggedIn,

    #[error("could not determine the current directory: {0}")]
    CurrentDir(std::io::Error),
}

impl CliError {
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Core(ShioriError::RemoteUpdate(source))
                if source
                    .downcast_ref::<KitsuError>()
                    .is_some_and(KitsuError::is_unauthorized) =>
            {
                Some(TOKEN_REJECTED)
            }
            Self::Core(e) => e.hint(),
            Self::NotLoggedIn => Some("run `shiori login --username <name>` first"),
            Self::Kitsu(e) if e.is_unauthorized() => Some(TOKEN_REJECTED),
            _ => None,
        }
    }
}
