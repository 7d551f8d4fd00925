//! Interaction state variants (target, hover, active).
//!
//! A state variant is an ordinary image of the map whose name is the base
//! image name, the separator and a state keyword, e.g. `arrow_hover`.
//! Composition links each base image to the variants present in the set.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpriteError;

use super::image::Image;
use super::options::SpriteOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    Target,
    Hover,
    Active,
}

impl State {
    pub const ALL: [State; 3] = [State::Target, State::Hover, State::Active];

    pub fn keyword(&self) -> &'static str {
        match self {
            State::Target => "target",
            State::Hover => "hover",
            State::Active => "active",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for State {
    type Err = SpriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        State::ALL
            .into_iter()
            .find(|state| state.keyword() == s)
            .ok_or_else(|| SpriteError::Config {
                message: format!("Unknown state '{}'", s),
                help: Some("Expected one of: target, hover, active".to_string()),
            })
    }
}

/// Which states are materialized for a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSet {
    enabled: BTreeMap<State, bool>,
}

impl Default for StateSet {
    fn default() -> Self {
        Self {
            enabled: State::ALL.into_iter().map(|s| (s, true)).collect(),
        }
    }
}

impl StateSet {
    pub fn from_options(options: &SpriteOptions) -> Self {
        Self {
            enabled: State::ALL
                .into_iter()
                .map(|s| (s, options.state_enabled(s)))
                .collect(),
        }
    }

    pub fn set(&mut self, state: State, enabled: bool) {
        self.enabled.insert(state, enabled);
    }

    pub fn is_enabled(&self, state: State) -> bool {
        self.enabled.get(&state).copied().unwrap_or(false)
    }

    /// Enabled states in keyword order (target, hover, active).
    pub fn enabled(&self) -> impl Iterator<Item = State> + '_ {
        self.enabled
            .iter()
            .filter(|(_, on)| **on)
            .map(|(state, _)| *state)
    }
}

/// Name of the variant of `base` for `state`.
pub fn variant_name(base: &str, separator: &str, state: State) -> String {
    format!("{}{}{}", base, separator, state.keyword())
}

/// Link every base image to the state variants present in `images`.
///
/// Images that are themselves variants never receive states.
pub fn compose_states(images: &mut [Image], separator: &str, states: &StateSet) {
    let names: HashSet<&str> = images.iter().map(|i| i.name.as_str()).collect();

    let mut links: Vec<(usize, State, String)> = Vec::new();
    for (idx, image) in images.iter().enumerate() {
        for state in states.enabled() {
            let variant = variant_name(&image.name, separator, state);
            if names.contains(variant.as_str()) {
                links.push((idx, state, variant));
            }
        }
    }

    let variants: HashSet<String> = links.iter().map(|(_, _, v)| v.clone()).collect();

    for image in images.iter_mut() {
        image.states.clear();
    }

    for (idx, state, variant) in links {
        if variants.contains(&images[idx].name) {
            continue;
        }
        images[idx].states.insert(state, variant);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn placeholder(name: &str) -> Image {
        Image::load(
            &PathBuf::from(format!("/nonexistent/{}.png", name)),
            format!("icons/{}.png", name),
        )
        .unwrap()
    }

    fn images(names: &[&str]) -> Vec<Image> {
        names.iter().map(|n| placeholder(n)).collect()
    }

    #[test]
    fn test_state_keywords() {
        assert_eq!(State::Hover.to_string(), "hover");
        assert_eq!("active".parse::<State>().unwrap(), State::Active);
        assert!("focus".parse::<State>().is_err());
    }

    #[test]
    fn test_variant_name() {
        assert_eq!(variant_name("ten-by-ten", "_", State::Hover), "ten-by-ten_hover");
        assert_eq!(variant_name("ten-by-ten", "-", State::Target), "ten-by-ten-target");
    }

    #[test]
    fn test_compose_default_separator() {
        let mut set = images(&["arrow", "arrow_hover", "arrow_active", "plus"]);
        compose_states(&mut set, "_", &StateSet::default());

        assert_eq!(set[0].state(State::Hover), Some("arrow_hover"));
        assert_eq!(set[0].state(State::Active), Some("arrow_active"));
        assert_eq!(set[0].state(State::Target), None);
        assert!(set[1].states.is_empty());
        assert!(set[3].states.is_empty());
    }

    #[test]
    fn test_compose_custom_separator() {
        let mut set = images(&["arrow", "arrow-hover", "arrow_active"]);
        compose_states(&mut set, "-", &StateSet::default());

        assert_eq!(set[0].state(State::Hover), Some("arrow-hover"));
        assert_eq!(set[0].state(State::Active), None);
    }

    #[test]
    fn test_compose_respects_disabled_states() {
        let mut states = StateSet::default();
        states.set(State::Hover, false);

        let mut set = images(&["arrow", "arrow_hover", "arrow_target"]);
        compose_states(&mut set, "_", &states);

        assert_eq!(set[0].state(State::Hover), None);
        assert_eq!(set[0].state(State::Target), Some("arrow_target"));
    }

    #[test]
    fn test_variants_do_not_nest() {
        let mut set = images(&["a", "a_hover", "a_hover_hover"]);
        compose_states(&mut set, "_", &StateSet::default());

        assert_eq!(set[0].state(State::Hover), Some("a_hover"));
        assert!(set[1].states.is_empty());
    }

    #[test]
    fn test_state_set_from_options() {
        let options = SpriteOptions::new().with("active_state", false);
        let states = StateSet::from_options(&options);

        let enabled: Vec<State> = states.enabled().collect();
        assert_eq!(enabled, vec![State::Target, State::Hover]);
    }
}
