use tutor_core::model::{LearningCard, Resource};

use crate::vm::pathway_vm::LinkVm;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CardTab {
    #[default]
    Overview,
    Concepts,
    Explore,
}

impl CardTab {
    pub const ALL: [CardTab; 3] = [CardTab::Overview, CardTab::Concepts, CardTab::Explore];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CardTab::Overview => "Overview",
            CardTab::Concepts => "Concepts",
            CardTab::Explore => "Explore",
        }
    }
}

/// Badges shown under the card title, e.g. `Beginner` and `30 minutes`.
#[must_use]
pub fn card_badges(card: &LearningCard) -> Vec<String> {
    [card.difficulty.as_deref(), card.estimated_time.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|badge| !badge.is_empty())
        .map(str::to_string)
        .collect()
}

/// Numbered suggested questions, `1. ...`.
#[must_use]
pub fn numbered_questions(card: &LearningCard) -> Vec<(usize, String)> {
    card.explore
        .suggested_questions
        .iter()
        .enumerate()
        .map(|(index, question)| (index + 1, question.clone()))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceVm {
    pub link: LinkVm,
    pub kind: Option<String>,
    pub description: Option<String>,
}

#[must_use]
pub fn resource_vms(resources: &[Resource]) -> Vec<ResourceVm> {
    resources
        .iter()
        .map(|resource| {
            let target = resource.link();
            ResourceVm {
                link: LinkVm {
                    label: resource.title.clone(),
                    href: target.href().to_string(),
                    external: target.is_external(),
                },
                kind: resource.kind.clone(),
                description: resource.description.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_core::model::{NO_RELATED_TOPICS, NO_SUGGESTED_QUESTIONS};
    use tutor_core::payload::classify_reply;

    fn card(json: &str) -> LearningCard {
        classify_reply(json).as_card().cloned().unwrap()
    }

    #[test]
    fn overview_is_the_default_tab() {
        assert_eq!(CardTab::default(), CardTab::Overview);
        let labels: Vec<_> = CardTab::ALL.iter().map(|tab| tab.label()).collect();
        assert_eq!(labels, vec!["Overview", "Concepts", "Explore"]);
    }

    #[test]
    fn badges_skip_missing_values() {
        let full = card(r#"{"learningCard": {"title": "t", "difficulty": "Beginner", "estimatedTime": "30 minutes"}}"#);
        assert_eq!(card_badges(&full), vec!["Beginner", "30 minutes"]);
        let bare = card(r#"{"learningCard": {"title": "t"}}"#);
        assert!(card_badges(&bare).is_empty());
    }

    #[test]
    fn missing_explore_uses_placeholders() {
        let bare = card(r#"{"learningCard": {"title": "t"}}"#);
        assert_eq!(numbered_questions(&bare), vec![(1, NO_SUGGESTED_QUESTIONS.to_string())]);
        assert_eq!(bare.explore.related_topics, vec![NO_RELATED_TOPICS]);
    }

    #[test]
    fn resources_only_link_to_web_urls() {
        let with_resources = card(
            r#"{"learningCard": {"title": "t", "resources": [
                {"title": "MDN", "type": "Documentation", "url": "https://developer.mozilla.org/"},
                {"title": "Shady", "url": "javascript:void(0)"}
            ]}}"#,
        );
        let vms = resource_vms(&with_resources.resources);
        assert!(vms[0].link.external);
        assert_eq!(vms[0].kind.as_deref(), Some("Documentation"));
        assert_eq!(vms[1].link.href, "#");
    }
}
