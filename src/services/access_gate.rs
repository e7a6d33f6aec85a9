use crate::entities::ChapterPolicy;
use crate::models::Entitlement;

/// Gate verdict for one chapter read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Serve the full content.
    Full,
    /// Serve metadata only, with a paywall indicator.
    Paywalled,
    /// 403 — not servable at all for this caller.
    Denied,
}

/// Chapter-level override always wins over the novel default. A novel
/// with neither set reads as open.
pub fn effective_policy(
    chapter_policy: Option<ChapterPolicy>,
    novel_default: Option<ChapterPolicy>,
) -> ChapterPolicy {
    chapter_policy
        .or(novel_default)
        .unwrap_or(ChapterPolicy::Public)
}

/// Decide whether a chapter is servable to the caller.
///
/// `author_id` is the owning novel's author. Authors only ever read their
/// own novels; unpublished content is visible to its author and admins.
pub fn evaluate_chapter_access(
    policy: ChapterPolicy,
    published: bool,
    author_id: i64,
    entitlement: &Entitlement,
) -> Access {
    if entitlement.is_admin() {
        return Access::Full;
    }

    if let Entitlement::Author { user_id, .. } = entitlement {
        return if *user_id == author_id {
            Access::Full
        } else {
            Access::Denied
        };
    }

    if !published {
        return Access::Denied;
    }

    match policy {
        ChapterPolicy::Public => Access::Full,
        ChapterPolicy::Private => match entitlement {
            Entitlement::Reader { approved: true, .. } => Access::Full,
            _ => Access::Paywalled,
        },
        ChapterPolicy::Vip => {
            if entitlement.is_vip() {
                Access::Full
            } else {
                Access::Paywalled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(vip: bool) -> Entitlement {
        Entitlement::Reader {
            user_id: 1,
            approved: true,
            vip,
        }
    }

    #[test]
    fn test_effective_policy_chapter_override_wins() {
        assert_eq!(
            effective_policy(Some(ChapterPolicy::Vip), Some(ChapterPolicy::Public)),
            ChapterPolicy::Vip
        );
        assert_eq!(
            effective_policy(None, Some(ChapterPolicy::Private)),
            ChapterPolicy::Private
        );
        assert_eq!(effective_policy(None, None), ChapterPolicy::Public);
    }

    #[test]
    fn test_public_serves_everyone() {
        for ent in [Entitlement::Anonymous, reader(false), reader(true)] {
            assert_eq!(
                evaluate_chapter_access(ChapterPolicy::Public, true, 9, &ent),
                Access::Full
            );
        }
    }

    #[test]
    fn test_private_requires_authentication() {
        assert_eq!(
            evaluate_chapter_access(ChapterPolicy::Private, true, 9, &Entitlement::Anonymous),
            Access::Paywalled
        );
        assert_eq!(
            evaluate_chapter_access(ChapterPolicy::Private, true, 9, &reader(false)),
            Access::Full
        );
        let unapproved = Entitlement::Reader {
            user_id: 1,
            approved: false,
            vip: false,
        };
        assert_eq!(
            evaluate_chapter_access(ChapterPolicy::Private, true, 9, &unapproved),
            Access::Paywalled
        );
    }

    #[test]
    fn test_vip_requires_active_membership() {
        assert_eq!(
            evaluate_chapter_access(ChapterPolicy::Vip, true, 9, &reader(false)),
            Access::Paywalled
        );
        assert_eq!(
            evaluate_chapter_access(ChapterPolicy::Vip, true, 9, &reader(true)),
            Access::Full
        );
        assert_eq!(
            evaluate_chapter_access(ChapterPolicy::Vip, true, 9, &Entitlement::Anonymous),
            Access::Paywalled
        );
    }

    #[test]
    fn test_authors_read_only_their_own_novels() {
        let author = Entitlement::Author {
            user_id: 9,
            novel_ids: vec![3],
            vip: false,
        };
        assert_eq!(
            evaluate_chapter_access(ChapterPolicy::Vip, true, 9, &author),
            Access::Full
        );
        assert_eq!(
            evaluate_chapter_access(ChapterPolicy::Public, true, 10, &author),
            Access::Denied
        );
        // own drafts are readable before publication
        assert_eq!(
            evaluate_chapter_access(ChapterPolicy::Public, false, 9, &author),
            Access::Full
        );
    }

    #[test]
    fn test_unpublished_denied_to_readers() {
        assert_eq!(
            evaluate_chapter_access(ChapterPolicy::Public, false, 9, &reader(true)),
            Access::Denied
        );
        assert_eq!(
            evaluate_chapter_access(ChapterPolicy::Public, false, 9, &Entitlement::Admin { user_id: 2 }),
            Access::Full
        );
    }
}
