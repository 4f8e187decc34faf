// SPDX-License-Identifier: GPL-3.0-only

//! Date planner wizard
//!
//! A three step wizard (food, activity, review) that ends by sending the
//! chosen plan to a chat bot. Sending never blocks the wizard: `submit`
//! moves to `Submitted` right away and the notification runs detached.

pub mod notify;

pub use notify::Notifier;

use tokio::task::JoinHandle;
use tracing::{debug, info};

/// A selectable preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanOption {
    pub id: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
}

pub const FOOD_OPTIONS: [PlanOption; 4] = [
    PlanOption { id: "sushi", name: "Sushi", emoji: "🍣" },
    PlanOption { id: "pizza", name: "Pizza", emoji: "🍕" },
    PlanOption { id: "steak", name: "Steak", emoji: "🥩" },
    PlanOption { id: "tacos", name: "Tacos", emoji: "🌮" },
];

pub const ACTIVITY_OPTIONS: [PlanOption; 4] = [
    PlanOption { id: "movie", name: "Movie", emoji: "🎬" },
    PlanOption { id: "arcade", name: "Arcade", emoji: "👾" },
    PlanOption { id: "walk", name: "Walk", emoji: "🌳" },
    PlanOption { id: "shopping", name: "Shop", emoji: "🛍️" },
];

/// Shown on the review step when nothing was picked
pub const FOOD_FALLBACK: &str = "Surprise Me";
pub const ACTIVITY_FALLBACK: &str = "Whatever";

/// Resolve a preset id to its display name; anything else is kept as typed
pub fn resolve_choice(options: &[PlanOption], input: &str) -> String {
    let trimmed = input.trim();
    options
        .iter()
        .find(|o| o.id.eq_ignore_ascii_case(trimmed) || o.name.eq_ignore_ascii_case(trimmed))
        .map(|o| o.name.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Wizard step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannerStep {
    Food,
    Activity,
    Review,
    Submitted,
}

impl PlannerStep {
    /// 1-based step number for the progress indicator
    pub fn number(&self) -> u8 {
        match self {
            PlannerStep::Food => 1,
            PlannerStep::Activity => 2,
            PlannerStep::Review | PlannerStep::Submitted => 3,
        }
    }
}

/// The chosen plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateOrder {
    pub food: String,
    pub activity: String,
}

impl DateOrder {
    pub fn new(food: Option<&str>, activity: Option<&str>) -> Self {
        let pick = |value: Option<&str>, fallback: &str| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };
        Self {
            food: pick(food, FOOD_FALLBACK),
            activity: pick(activity, ACTIVITY_FALLBACK),
        }
    }

    /// Chat message in Markdown
    pub fn message(&self) -> String {
        format!(
            "💌 **New Valentine Date Order!** ---------------------------\n\
             🍱 **Food:** {}\n\
             🎡 **Activity:** {}\n\
             ---------------------------\n\
             Get ready! She said YES! 💍",
            self.food, self.activity
        )
    }
}

/// Wizard state
#[derive(Debug, Clone)]
pub struct DatePlanner {
    step: PlannerStep,
    food: Option<String>,
    activity: Option<String>,
}

impl Default for DatePlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl DatePlanner {
    pub fn new() -> Self {
        Self {
            step: PlannerStep::Food,
            food: None,
            activity: None,
        }
    }

    pub fn step(&self) -> PlannerStep {
        self.step
    }

    pub fn food(&self) -> Option<&str> {
        self.food.as_deref()
    }

    pub fn activity(&self) -> Option<&str> {
        self.activity.as_deref()
    }

    /// Pick the food; only on the food step. Blank input is rejected.
    pub fn select_food(&mut self, choice: &str) -> bool {
        if self.step != PlannerStep::Food || choice.trim().is_empty() {
            return false;
        }
        self.food = Some(resolve_choice(&FOOD_OPTIONS, choice));
        true
    }

    /// Pick the activity; only on the activity step. Blank input is rejected.
    pub fn select_activity(&mut self, choice: &str) -> bool {
        if self.step != PlannerStep::Activity || choice.trim().is_empty() {
            return false;
        }
        self.activity = Some(resolve_choice(&ACTIVITY_OPTIONS, choice));
        true
    }

    /// Advance; rejected while the current step has no selection
    pub fn next(&mut self) -> bool {
        let next = match self.step {
            PlannerStep::Food if self.food.is_some() => PlannerStep::Activity,
            PlannerStep::Activity if self.activity.is_some() => PlannerStep::Review,
            _ => {
                debug!(step = ?self.step, "Next rejected");
                return false;
            }
        };
        self.step = next;
        true
    }

    /// Go back one step; selections are kept
    pub fn back(&mut self) -> bool {
        let previous = match self.step {
            PlannerStep::Activity => PlannerStep::Food,
            PlannerStep::Review => PlannerStep::Activity,
            PlannerStep::Food | PlannerStep::Submitted => return false,
        };
        self.step = previous;
        true
    }

    /// The plan as it would be sent
    pub fn order(&self) -> DateOrder {
        DateOrder::new(self.food.as_deref(), self.activity.as_deref())
    }

    /// Send the plan. Only from the review step.
    ///
    /// Moves to `Submitted` immediately; the returned handle resolves when
    /// the notification attempt is over, whatever its outcome.
    pub fn submit(&mut self, notifier: &Notifier) -> Option<JoinHandle<()>> {
        if self.step != PlannerStep::Review {
            debug!(step = ?self.step, "Submit rejected");
            return None;
        }
        let order = self.order();
        info!(food = %order.food, activity = %order.activity, "Date plan submitted");
        self.step = PlannerStep::Submitted;
        Some(notifier.notify(order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotifySettings;

    #[test]
    fn test_next_requires_selection() {
        let mut planner = DatePlanner::new();
        assert!(!planner.next());
        assert!(planner.select_food("sushi"));
        assert!(planner.next());
        assert_eq!(planner.step(), PlannerStep::Activity);
        assert!(!planner.next());
    }

    #[test]
    fn test_select_only_on_own_step() {
        let mut planner = DatePlanner::new();
        assert!(!planner.select_activity("walk"));
        assert!(!planner.select_food("   "));
        planner.select_food("Pizza");
        planner.next();
        assert!(!planner.select_food("steak"));
        assert_eq!(planner.food(), Some("Pizza"));
    }

    #[test]
    fn test_back_keeps_selection() {
        let mut planner = DatePlanner::new();
        assert!(!planner.back());
        planner.select_food("tacos");
        planner.next();
        planner.select_activity("arcade");
        planner.next();
        assert_eq!(planner.step(), PlannerStep::Review);
        assert!(planner.back());
        assert_eq!(planner.step(), PlannerStep::Activity);
        assert_eq!(planner.activity(), Some("Arcade"));
    }

    #[test]
    fn test_free_text_choice() {
        assert_eq!(resolve_choice(&FOOD_OPTIONS, "ramen"), "ramen");
        assert_eq!(resolve_choice(&ACTIVITY_OPTIONS, "SHOPPING"), "Shop");
    }

    #[test]
    fn test_order_fallbacks() {
        let order = DateOrder::new(None, Some(" "));
        assert_eq!(order.food, FOOD_FALLBACK);
        assert_eq!(order.activity, ACTIVITY_FALLBACK);
    }

    #[test]
    fn test_message_format() {
        let message = DateOrder::new(Some("Sushi"), Some("Movie")).message();
        assert!(message.starts_with("💌 **New Valentine Date Order!**"));
        assert!(message.contains("🍱 **Food:** Sushi\n"));
        assert!(message.contains("🎡 **Activity:** Movie\n"));
        assert!(message.ends_with("Get ready! She said YES! 💍"));
    }

    #[tokio::test]
    async fn test_submit_moves_on_immediately() {
        let notifier = Notifier::new(NotifySettings::default());
        let mut planner = DatePlanner::new();
        assert!(planner.submit(&notifier).is_none());

        planner.select_food("steak");
        planner.next();
        planner.select_activity("walk");
        planner.next();

        let handle = planner.submit(&notifier).unwrap();
        assert_eq!(planner.step(), PlannerStep::Submitted);
        assert!(!planner.back());
        handle.await.unwrap();
    }
}
