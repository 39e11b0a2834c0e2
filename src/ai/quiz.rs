//! Locating and decoding the `<form>` quiz fragment inside free-form model output.
//!
//! Models wrap the fragment in chatter ("Sure! Here is your question: ..."),
//! so the fragment is cut out first and only that slice is parsed as XML.

use crate::shared::QuizChoice;

const FORM_OPEN: &str = "<form";
const FORM_CLOSE: &str = "</form>";

/// Decoded content of a `<form>` fragment. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizContent {
    pub question: Option<String>,
    pub choices: Vec<QuizChoice>,
    pub answer: Option<String>,
}

impl QuizContent {
    pub fn choice_texts(&self) -> Vec<String> {
        self.choices.iter().map(|c| c.text.clone()).collect()
    }
}

/// Returns the slice from the first `<form` up to and including the first
/// `</form>` after it.
pub fn extract_form_fragment(response: &str) -> Option<&str> {
    let start = response.find(FORM_OPEN)?;
    let end = start + response[start..].find(FORM_CLOSE)? + FORM_CLOSE.len();
    Some(&response[start..end])
}

/// Parses a fragment produced by [`extract_form_fragment`].
pub fn parse_quiz(fragment: &str) -> Result<QuizContent, roxmltree::Error> {
    let doc = roxmltree::Document::parse(fragment)?;
    let Some(form) = doc.descendants().find(|n| n.has_tag_name("form")) else {
        return Ok(QuizContent::default());
    };

    let child = |name: &str| form.children().find(|n| n.has_tag_name(name));

    let choices = child("choices")
        .map(|choices| {
            choices
                .children()
                .filter(|n| n.is_element())
                .map(|n| QuizChoice {
                    key: n.tag_name().name().to_string(),
                    text: inner_text(n),
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(QuizContent {
        question: child("question").map(inner_text),
        choices,
        answer: child("answer").map(inner_text),
    })
}

fn inner_text(node: roxmltree::Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect { expected: String },
}

/// Checks the choice at `index` against the recorded answer marker. The
/// marker may name a choice by tag (`b`) or repeat its text.
pub fn judge_choice(choices: &[QuizChoice], answer: &str, index: usize) -> Option<Verdict> {
    let picked = choices.get(index)?;
    let answer = answer.trim();
    let matches = |choice: &QuizChoice| {
        choice.key.eq_ignore_ascii_case(answer)
            || choice.text.trim().to_lowercase() == answer.to_lowercase()
    };

    if matches(picked) {
        return Some(Verdict::Correct);
    }

    let expected = choices
        .iter()
        .find(|c| matches(c))
        .map(|c| c.text.clone())
        .unwrap_or_else(|| answer.to_string());
    Some(Verdict::Incorrect { expected })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(key: &str, text: &str) -> QuizChoice {
        QuizChoice {
            key: key.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_fragment_is_cut_from_chatter() {
        let response = "Claro! <form><question>Q</question></form> Boa sorte!";
        assert_eq!(
            extract_form_fragment(response),
            Some("<form><question>Q</question></form>")
        );
    }

    #[test]
    fn test_fragment_uses_first_close_after_open() {
        let response = "</form> x <form a=\"1\">one</form><form>two</form>";
        assert_eq!(extract_form_fragment(response), Some("<form a=\"1\">one</form>"));
    }

    #[test]
    fn test_missing_open_or_close_tag() {
        assert_eq!(extract_form_fragment("just words"), None);
        assert_eq!(extract_form_fragment("<form><question>Q</question>"), None);
        assert_eq!(extract_form_fragment("</form> then <form>"), None);
    }

    #[test]
    fn test_parse_question_choices_and_answer() {
        let quiz = parse_quiz(
            "<form><question>Q</question><choices><a>1</a><b>2</b></choices><answer>b</answer></form>",
        )
        .unwrap();

        assert_eq!(quiz.question.as_deref(), Some("Q"));
        assert_eq!(quiz.choices, vec![choice("a", "1"), choice("b", "2")]);
        assert_eq!(quiz.choice_texts(), vec!["1".to_string(), "2".to_string()]);
        assert_eq!(quiz.answer.as_deref(), Some("b"));
    }

    #[test]
    fn test_choices_keep_document_order_with_any_tag() {
        let quiz = parse_quiz(
            "<form><choices><z>last letter</z><option>middle</option><a>first letter</a></choices></form>",
        )
        .unwrap();

        assert_eq!(
            quiz.choice_texts(),
            vec!["last letter", "middle", "first letter"]
        );
        assert_eq!(quiz.choices[1].key, "option");
        assert_eq!(quiz.question, None);
        assert_eq!(quiz.answer, None);
    }

    #[test]
    fn test_inner_text_flattens_markup_and_entities() {
        let quiz = parse_quiz("<form><question>Quanto é <b>2+2</b> &amp; 1?</question></form>").unwrap();
        assert_eq!(quiz.question.as_deref(), Some("Quanto é 2+2 & 1?"));
    }

    #[test]
    fn test_malformed_fragment_is_an_error() {
        assert!(parse_quiz("<form><question>Q</form>").is_err());
        assert!(parse_quiz("<form><question>A & B</question></form>").is_err());
    }

    #[test]
    fn test_judge_by_key_or_text() {
        let choices = vec![choice("a", "3"), choice("b", "4"), choice("c", "5")];

        assert_eq!(judge_choice(&choices, "b", 1), Some(Verdict::Correct));
        assert_eq!(judge_choice(&choices, " B ", 1), Some(Verdict::Correct));
        assert_eq!(judge_choice(&choices, "4", 1), Some(Verdict::Correct));
        assert_eq!(
            judge_choice(&choices, "b", 0),
            Some(Verdict::Incorrect {
                expected: "4".to_string()
            })
        );
    }

    #[test]
    fn test_judge_unknown_answer_and_out_of_range() {
        let choices = vec![choice("a", "3"), choice("b", "4")];
        assert_eq!(
            judge_choice(&choices, "quatro", 0),
            Some(Verdict::Incorrect {
                expected: "quatro".to_string()
            })
        );
        assert_eq!(judge_choice(&choices, "a", 5), None);
    }
}
