use serde_json::Value;

use super::lenient::{
    Object, code, items, objects, pick, resources, text, text_list, text_or,
};
use crate::model::{
    Example, FurtherLearning, Level, LevelSteps, NO_DESCRIPTION, NO_TITLE, Pathway, Quiz, Step,
    StepContent,
};

pub(crate) fn pathway(obj: &Object) -> Pathway {
    Pathway {
        title: text_or(obj.get("title"), NO_TITLE),
        description: text_or(obj.get("description"), NO_DESCRIPTION),
        prerequisites: text_list(obj.get("prerequisites")),
        levels: levels(obj.get("levels")),
        further_learning: objects(pick(obj, &["furtherLearning", "further_learning"]))
            .into_iter()
            .filter_map(further_learning)
            .collect(),
    }
}

fn levels(value: Option<&Value>) -> Vec<LevelSteps> {
    let Some(Value::Object(map)) = value else {
        return Vec::new();
    };

    let mut levels: Vec<LevelSteps> = Vec::with_capacity(Level::ALL.len());
    for (key, raw_steps) in map {
        let Some(level) = Level::from_key(key) else {
            tracing::debug!(key = %key, "dropping unknown pathway level");
            continue;
        };
        if levels.iter().any(|entry| entry.level == level) {
            continue;
        }
        // A level that is present but not an array still shows up, just empty.
        let steps = match raw_steps {
            Value::Array(raw) => raw
                .iter()
                .enumerate()
                .filter_map(|(index, value)| step(index, value))
                .collect(),
            _ => Vec::new(),
        };
        levels.push(LevelSteps { level, steps });
    }
    levels.sort_by_key(|entry| entry.level);
    levels
}

fn step(index: usize, value: &Value) -> Option<Step> {
    let obj = value.as_object()?;
    let title = text(obj.get("title")).unwrap_or_else(|| format!("Step {}", index + 1));

    Some(Step {
        title,
        learning_objectives: text_list(pick(obj, &["learningObjectives", "learning_objectives"])),
        content: step_content(obj.get("content")),
        key_takeaways: text_list(pick(obj, &["keyTakeaways", "key_takeaways"])),
        quizzes: items(pick(obj, &["quizzes", "quiz"]))
            .into_iter()
            .filter_map(Value::as_object)
            .filter_map(quiz)
            .collect(),
        resources: resources(obj.get("resources")),
    })
}

fn step_content(value: Option<&Value>) -> StepContent {
    match value {
        Some(Value::Object(obj)) => StepContent {
            introduction: text(obj.get("introduction")),
            explanation: text(obj.get("explanation")).unwrap_or_default(),
            examples: objects(obj.get("examples"))
                .into_iter()
                .filter_map(example)
                .collect(),
        },
        // Some replies collapse the content block into a single string.
        Some(other) => StepContent {
            explanation: text(Some(other)).unwrap_or_default(),
            ..StepContent::default()
        },
        None => StepContent::default(),
    }
}

fn example(obj: &Object) -> Option<Example> {
    let example = Example {
        title: text(obj.get("title")),
        description: text(obj.get("description")).unwrap_or_default(),
        code: code(obj.get("code")),
    };
    let is_empty =
        example.title.is_none() && example.description.is_empty() && example.code.is_none();
    (!is_empty).then_some(example)
}

fn quiz(obj: &Object) -> Option<Quiz> {
    Some(Quiz {
        question: text(obj.get("question"))?,
        options: text_list(obj.get("options")),
        answer: text(pick(obj, &["answer", "correctAnswer", "correct_answer"])).unwrap_or_default(),
        explanation: text(obj.get("explanation")),
    })
}

fn further_learning(obj: &Object) -> Option<FurtherLearning> {
    Some(FurtherLearning {
        topic: text(obj.get("topic"))?,
        description: text(obj.get("description")).unwrap_or_default(),
        resources: text_list(obj.get("resources")),
    })
}
