use serde_json::Value;

use super::lenient::{
    Object, code, items, object, objects, pick, resources, text, text_list,
    text_list_if_present, text_or, title_of,
};
use crate::model::{
    CodeSnippet, CommonMistake, Concept, Explore, LearningCard, NO_NOTES, NO_OVERVIEW,
    NO_RELATED_TOPICS, NO_SUGGESTED_QUESTIONS, NO_TITLE, PracticeExercise, Terminology,
};

pub(crate) fn learning_card(obj: &Object) -> LearningCard {
    LearningCard {
        title: text_or(obj.get("title"), NO_TITLE),
        overview: text_or(pick(obj, &["overview", "description"]), NO_OVERVIEW),
        difficulty: text(obj.get("difficulty")),
        estimated_time: text(pick(obj, &["estimatedTime", "estimated_time"])),
        prerequisites: text_list(obj.get("prerequisites")),
        key_terminologies: items(pick(obj, &["keyTerminologies", "key_terminologies"]))
            .into_iter()
            .filter_map(terminology)
            .collect(),
        concepts: items(obj.get("concepts"))
            .into_iter()
            .filter_map(concept)
            .collect(),
        common_mistakes: objects(pick(obj, &["commonMistakes", "common_mistakes"]))
            .into_iter()
            .filter_map(common_mistake)
            .collect(),
        practice_exercises: objects(pick(obj, &["practiceExercises", "practice_exercises"]))
            .into_iter()
            .filter_map(practice_exercise)
            .collect(),
        explore: explore(object(obj.get("explore"))),
        resources: resources(obj.get("resources")),
    }
}

fn terminology(value: &Value) -> Option<Terminology> {
    let title = title_of(value)?;
    let (description, examples) = match value {
        Value::Object(obj) => (
            text(pick(obj, &["description", "definition"])),
            text_list(obj.get("examples")),
        ),
        _ => (None, Vec::new()),
    };
    Some(Terminology {
        title,
        description,
        examples,
    })
}

fn concept(value: &Value) -> Option<Concept> {
    let title = title_of(value)?;
    let Value::Object(obj) = value else {
        return Some(Concept {
            title,
            description: String::new(),
            examples: Vec::new(),
            code_snippets: Vec::new(),
        });
    };
    Some(Concept {
        title,
        description: text(obj.get("description")).unwrap_or_default(),
        examples: text_list(obj.get("examples")),
        code_snippets: objects(pick(obj, &["codeSnippets", "code_snippets"]))
            .into_iter()
            .filter_map(code_snippet)
            .collect(),
    })
}

fn code_snippet(obj: &Object) -> Option<CodeSnippet> {
    Some(CodeSnippet {
        code: code(obj.get("code"))?,
        title: text(obj.get("title")),
        language: text(obj.get("language")),
        explanation: text(obj.get("explanation")),
    })
}

fn common_mistake(obj: &Object) -> Option<CommonMistake> {
    Some(CommonMistake {
        mistake: text(obj.get("mistake"))?,
        correction: text(obj.get("correction")).unwrap_or_default(),
    })
}

fn practice_exercise(obj: &Object) -> Option<PracticeExercise> {
    Some(PracticeExercise {
        title: text(obj.get("title"))?,
        description: text(obj.get("description")).unwrap_or_default(),
        difficulty: text(obj.get("difficulty")),
        hints: text_list(obj.get("hints")),
        solution: text(obj.get("solution")),
    })
}

fn explore(obj: Option<&Object>) -> Explore {
    let Some(obj) = obj else {
        return Explore::default();
    };

    let related_topics = match pick(obj, &["relatedTopics", "related_topics"]) {
        Some(Value::Array(topics)) => topics.iter().filter_map(title_of).collect(),
        _ => vec![NO_RELATED_TOPICS.to_string()],
    };
    let suggested_questions =
        text_list_if_present(pick(obj, &["suggestedQuestions", "suggested_questions"]))
            .unwrap_or_else(|| vec![NO_SUGGESTED_QUESTIONS.to_string()]);
    let notes = text_list_if_present(pick(obj, &["note", "notes"]))
        .unwrap_or_else(|| vec![NO_NOTES.to_string()]);

    Explore {
        related_topics,
        suggested_questions,
        notes,
    }
}
