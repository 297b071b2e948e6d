use crate::events::EventRepository;
use crate::PlayerLogError;

pub trait Store {
    type Events<'a>: EventRepository
    where
        Self: 'a;

    fn events(&self) -> Self::Events<'_>;

    fn with_tx<F, T>(&self, f: F) -> Result<T, PlayerLogError>
    where
        F: FnOnce(&Self) -> Result<T, PlayerLogError>;
}
