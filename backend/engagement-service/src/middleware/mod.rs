mod actor;

pub use actor::{ActorId, IdentityMiddleware, MaybeActor};
