use thiserror::Error;

use crate::model::RatingError;
use crate::player::PlayerError;
use crate::progress::ProgressError;
use crate::wizard::WizardError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error(transparent)]
    Player(#[from] PlayerError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Rating(#[from] RatingError),
}
