use std::fmt;

use rand::Rng;

use crate::selector::Selector;

/// The closed set of response categories a work item can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reaction {
    Happy,
    MidHappy,
    Serious,
    Sad,
}

impl Reaction {
    /// Every member, in icon order.
    pub const ALL: [Reaction; 4] = [
        Reaction::Happy,
        Reaction::MidHappy,
        Reaction::Serious,
        Reaction::Sad,
    ];

    /// The slug the portal uses in icon class names.
    pub fn slug(self) -> &'static str {
        match self {
            Reaction::Happy => "happy",
            Reaction::MidHappy => "midhappy",
            Reaction::Serious => "serious",
            Reaction::Sad => "sad",
        }
    }

    /// Selector for this reaction's icon elements on a detail page.
    pub fn icon_selector(self) -> Selector {
        Selector::css(format!(
            ".transition-all.ease-linear.duration-150.icon-{}-outline",
            self.slug()
        ))
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// How the traversal picks a reaction for each work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionPolicy {
    /// Always the same member.
    Fixed(Reaction),
    /// Uniform draw over the whole set, per item.
    Uniform,
}

impl ReactionPolicy {
    pub fn pick(&self, rng: &mut impl Rng) -> Reaction {
        match self {
            ReactionPolicy::Fixed(reaction) => *reaction,
            ReactionPolicy::Uniform => Reaction::ALL[rng.gen_range(0..Reaction::ALL.len())],
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn icon_selector_follows_portal_naming_scheme() {
        assert_eq!(
            Reaction::MidHappy.icon_selector().to_string(),
            ".transition-all.ease-linear.duration-150.icon-midhappy-outline"
        );
    }

    #[test]
    fn fixed_policy_ignores_the_rng() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..16 {
            assert_eq!(
                ReactionPolicy::Fixed(Reaction::Serious).pick(&mut rng),
                Reaction::Serious
            );
        }
    }

    #[test]
    fn uniform_policy_reaches_every_member() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..64 {
            seen.insert(ReactionPolicy::Uniform.pick(&mut rng));
        }
        assert_eq!(seen.len(), Reaction::ALL.len());
    }
}
