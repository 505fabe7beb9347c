use poise::serenity_prelude::UserId;

/// Authorization policy for restricted actions. Injected through the bot state
/// so handlers don't compare raw ids inline.
#[derive(Debug, Clone, Copy)]
pub struct Authorizer {
    owner: UserId,
}

impl Authorizer {
    pub fn new(owner: UserId) -> Authorizer {
        Authorizer { owner }
    }

    /// Whether `user` may run owner-only commands such as `pick_next`.
    pub fn is_owner(&self, user: UserId) -> bool {
        user == self.owner
    }

    /// Whether `actor` may resolve a pending suggestion preview opened by
    /// `requester`. Only the original requester may confirm or cancel.
    pub fn may_resolve_suggestion(&self, requester: UserId, actor: UserId) -> bool {
        requester == actor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_recognized() {
        let auth = Authorizer::new(UserId::new(42));
        assert!(auth.is_owner(UserId::new(42)));
        assert!(!auth.is_owner(UserId::new(43)));
    }

    #[test]
    fn only_requester_may_resolve() {
        let auth = Authorizer::new(UserId::new(1));
        assert!(auth.may_resolve_suggestion(UserId::new(7), UserId::new(7)));
        assert!(!auth.may_resolve_suggestion(UserId::new(7), UserId::new(8)));
        // The owner gets no special treatment on someone else's preview.
        assert!(!auth.may_resolve_suggestion(UserId::new(7), UserId::new(1)));
    }
}
