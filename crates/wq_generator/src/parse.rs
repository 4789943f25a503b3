use serde_json::Value;

use wq_core::{Error, QuizData, Result};

const DEFAULT_EXPLANATION: &str = "Based on the article content.";

/// Parse a model response into a normalized quiz.
///
/// The body is parsed as JSON directly; if that fails, the first balanced
/// `{...}` region is extracted and parsed instead. Output with no balanced
/// object, or without a `questions` field, is rejected.
pub fn parse_quiz_response(body: &str) -> Result<QuizData> {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => {
            let snippet = extract_json_object(body).ok_or_else(|| {
                Error::Generation("No JSON object found in model output".to_string())
            })?;
            serde_json::from_str(snippet).map_err(|e| {
                Error::Generation(format!("Extracted JSON failed to parse: {}", e))
            })?
        }
    };

    if value.get("questions").is_none() {
        return Err(Error::Generation(
            "Model output is missing 'questions'".to_string(),
        ));
    }

    let mut quiz: QuizData = serde_json::from_value(value)
        .map_err(|e| Error::Generation(format!("Model output has invalid shape: {}", e)))?;
    normalize_quiz(&mut quiz);
    Ok(quiz)
}

/// Fill in the placeholder explanation for questions that lack one.
/// Difficulty and related-topics coercion happen during deserialization.
fn normalize_quiz(quiz: &mut QuizData) {
    for question in &mut quiz.questions {
        if question.explanation.trim().is_empty() {
            question.explanation = DEFAULT_EXPLANATION.to_string();
        }
    }
}

/// Best-effort extraction of the first brace-balanced region. Braces inside
/// string literals are not interpreted, so this can misjudge pathological
/// output; unbalanced input returns None rather than a partial slice.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    for (offset, c) in text[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use wq_core::Difficulty;

    const VALID_QUIZ: &str = r#"{
        "title": "Turing Award Quiz",
        "summary": "Questions about the ACM Turing Award.",
        "questions": [
            {
                "question": "Which organization grants the Turing Award?",
                "options": ["ACM", "IEEE", "Royal Society", "NSF"],
                "answer": "ACM",
                "difficulty": "easy",
                "explanation": "The award is granted annually by the ACM."
            },
            {
                "question": "What is the award often called?",
                "options": [
                    "Nobel Prize of Computing",
                    "Fields Medal",
                    "Millennium Prize",
                    "Abel Prize"
                ],
                "answer": "Nobel Prize of Computing",
                "difficulty": "Tricky",
                "explanation": ""
            }
        ],
        "related_topics": ["Alan Turing", "ACM"]
    }"#;

    #[test]
    fn parses_strict_json() {
        let quiz = parse_quiz_response(VALID_QUIZ).unwrap();
        assert_eq!(quiz.title, "Turing Award Quiz");
        assert_eq!(quiz.questions.len(), 2);
        assert_eq!(quiz.related_topics.len(), 2);
    }

    #[test]
    fn normalizes_difficulty_and_explanation() {
        let quiz = parse_quiz_response(VALID_QUIZ).unwrap();
        let second = &quiz.questions[1];
        assert_eq!(second.difficulty, Difficulty::Medium);
        assert_eq!(second.explanation, DEFAULT_EXPLANATION);

        let first = &quiz.questions[0];
        assert_eq!(first.difficulty, Difficulty::Easy);
        assert!(first.options.contains(&first.answer));
    }

    #[test]
    fn recovers_json_wrapped_in_prose() {
        let body = format!("Here is your quiz:\n```json\n{}\n```\nEnjoy!", VALID_QUIZ);
        let quiz = parse_quiz_response(&body).unwrap();
        assert_eq!(quiz.questions.len(), 2);
    }

    #[test]
    fn rejects_output_without_json() {
        let err = parse_quiz_response("Sorry, I cannot help with that.").unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[test]
    fn rejects_unbalanced_braces() {
        let err = parse_quiz_response("{\"questions\": [").unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[test]
    fn rejects_missing_questions_field() {
        let err = parse_quiz_response(r#"{"title": "Quiz", "summary": "No questions."}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[test]
    fn extracts_first_balanced_object() {
        assert_eq!(
            extract_json_object("noise {\"a\": {\"b\": 1}} trailing {\"c\": 2}"),
            Some("{\"a\": {\"b\": 1}}")
        );
        assert_eq!(extract_json_object("no braces here"), None);
        assert_eq!(extract_json_object("{{"), None);
    }
}
