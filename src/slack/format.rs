use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::blocks::{Block, ButtonStyle, Element, SelectOption, TextObject};
use super::feedback::{
    DISLIKE_ACTION_ID, DOC_BUTTON_ACTION_ID, LIKE_ACTION_ID, build_document_feedback_id,
    build_feedback_id,
};
use super::text::{
    decode_escapes, normalize_whitespace, remove_interactions, time_ago, translate_highlights,
};
use crate::models::{DocumentSource, Quote, SearchDoc, SearchFeedbackType};

pub const DEFAULT_NUM_DOCS_TO_DISPLAY: usize = 5;
const MAX_QUOTES_PER_DOC: usize = 5;

const NO_ANSWER_TEXT: &str =
    "Sorry, I was unable to find an answer, but I did find some potentially relevant docs 🤓";
const NO_QUOTES_WARNING: &str =
    "*Warning*: no sources were quoted for this answer, so it may be unreliable 😔";
const DOC_FEEDBACK_HELP: &str = "- 'Up-Boost' if this document is a good source of information and should be shown more often.\n\
- 'Down-boost' if this document is a poor source of information and should be shown less often.\n\
- 'Hide' if this document is deprecated and should never be shown anymore.";

/// How the question reached the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageOrigin {
    /// Typed into a channel or thread the bot reads; the user sees their own message.
    #[default]
    Conversation,
    /// Sent through a slash command, which leaves no visible message behind.
    SlashCommand,
}

/// Everything the answer layout needs.
#[derive(Debug, Default)]
pub struct QaResponse<'a> {
    pub message_id: Option<u64>,
    pub answer: Option<&'a str>,
    pub quotes: Option<&'a [Quote]>,
    pub source_filters: Option<&'a [DocumentSource]>,
    pub time_cutoff: Option<DateTime<Utc>>,
    pub favor_recent: bool,
    pub skip_quotes: bool,
}

/// Like/dislike buttons for a whole answer.
pub fn qa_feedback_block(message_id: u64) -> Block {
    Block::Actions {
        block_id: build_feedback_id(message_id),
        elements: vec![
            Element::button(LIKE_ACTION_ID, "👍").with_style(ButtonStyle::Primary),
            Element::button(DISLIKE_ACTION_ID, "👎").with_style(ButtonStyle::Danger),
        ],
    }
}

/// The boost / down-boost / hide selector shown after a user clicks a document's feedback button.
pub fn document_feedback_options() -> Block {
    let option = |text: &str, kind: SearchFeedbackType| SelectOption {
        text: TextObject::plain(text),
        value: kind.as_str().to_string(),
    };

    Block::section_with(
        DOC_FEEDBACK_HELP,
        Some(Element::RadioButtons {
            options: vec![
                option(":thumbsup: Up-Boost", SearchFeedbackType::Endorse),
                option(":thumbsdown: Down-Boost", SearchFeedbackType::Reject),
                option(":x: Hide", SearchFeedbackType::Hide),
            ],
        }),
    )
}

pub fn doc_feedback_button(
    message_id: u64,
    document_id: &str,
    rank: usize,
) -> Result<Element, super::FeedbackIdError> {
    let feedback_id = build_document_feedback_id(message_id, document_id, rank)?;
    Ok(Element::button(DOC_BUTTON_ACTION_ID, "Give Feedback").with_value(feedback_id))
}

/// Echo the question back when the user has no visible copy of it.
pub fn restate_blocks(query: &str, origin: MessageOrigin) -> Vec<Block> {
    match origin {
        MessageOrigin::Conversation => vec![],
        MessageOrigin::SlashCommand => vec![
            Block::header("Responding to the Query"),
            Block::section(format!("```{query}```")),
        ],
    }
}

pub fn documents_blocks(
    documents: &[SearchDoc],
    message_id: Option<u64>,
    num_docs_to_display: usize,
) -> Vec<Block> {
    documents_blocks_at(documents, message_id, num_docs_to_display, Utc::now())
}

fn documents_blocks_at(
    documents: &[SearchDoc],
    message_id: Option<u64>,
    num_docs_to_display: usize,
    now: DateTime<Utc>,
) -> Vec<Block> {
    let mut blocks = vec![Block::header("Reference Documents")];
    let mut seen = HashSet::new();
    let mut included = 0;

    for (rank, doc) in documents.iter().enumerate() {
        if included >= num_docs_to_display {
            break;
        }
        if !seen.insert(doc.document_id.as_str()) {
            continue;
        }

        let name = doc.source_type.display_name(&doc.semantic_identifier);
        let used_chars = name.chars().count() + 3;
        let excerpt = translate_highlights(&doc.match_highlights, used_chars);

        let mut text = match doc.link.as_deref().filter(|l| !l.is_empty()) {
            Some(link) => format!("<{link}|{name}>\n"),
            None => format!("{name}\n"),
        };
        if let Some(updated_at) = doc.updated_at {
            text.push_str(&format!("_Updated {}_\n", time_ago(updated_at, now)));
        }
        text.push('>');
        text.push_str(&remove_interactions(&excerpt));

        let accessory = message_id.and_then(|id| {
            doc_feedback_button(id, &doc.document_id, rank)
                .inspect_err(|e| warn!(error = %e, "rendering document without feedback button"))
                .ok()
        });

        blocks.push(Block::section_with(text, accessory));
        blocks.push(Block::Divider);
        included += 1;
    }

    blocks
}

/// Group the cited passages by document, longest first. Empty when nothing is renderable.
pub fn quotes_block(quotes: &[Quote]) -> Vec<Block> {
    struct Group<'a> {
        document_id: &'a str,
        link: &'a str,
        name: String,
        quotes: Vec<String>,
    }

    let mut groups: Vec<Group> = Vec::new();
    for q in quotes.iter().filter(|q| q.is_renderable()) {
        let cleaned = normalize_whitespace(&q.quote).trim().to_string();
        match groups.iter_mut().find(|g| g.document_id == q.document_id) {
            Some(group) => group.quotes.push(cleaned),
            None => groups.push(Group {
                document_id: &q.document_id,
                link: q.link.as_deref().unwrap_or_default(),
                name: q.source_type.display_name(&q.semantic_identifier),
                quotes: vec![cleaned],
            }),
        }
    }

    if groups.is_empty() {
        return vec![];
    }

    let lines: Vec<String> = groups
        .into_iter()
        .map(|mut group| {
            // Stable sort keeps the original order among equal lengths.
            group.quotes.sort_by_key(|q| std::cmp::Reverse(q.chars().count()));
            group.quotes.truncate(MAX_QUOTES_PER_DOC);
            let snippets = group
                .quotes
                .iter()
                .map(|q| format!("```{q}```"))
                .collect::<Vec<_>>()
                .join("\n");
            format!("<{}|{}>:\n{}", group.link, group.name, remove_interactions(&snippets))
        })
        .collect();

    vec![Block::section(format!(
        "*Relevant Snippets*\n{}",
        lines.join("\n")
    ))]
}

fn filter_block(
    source_filters: Option<&[DocumentSource]>,
    time_cutoff: Option<DateTime<Utc>>,
    favor_recent: bool,
) -> Option<Block> {
    let sources = source_filters.filter(|s| !s.is_empty());
    if sources.is_none() && time_cutoff.is_none() && !favor_recent {
        return None;
    }

    let mut text = String::from("Filters: ");
    if let Some(sources) = sources {
        let names: Vec<&str> = sources.iter().map(|s| s.as_str()).collect();
        text.push_str(&format!("`Sources in [{}]`", names.join(", ")));
        if time_cutoff.is_some() || favor_recent {
            text.push_str(" and ");
        }
    }
    if let Some(cutoff) = time_cutoff {
        text.push_str(&format!("`Docs Updated >= {}` ", cutoff.format("%b %d, %Y")));
    }
    if favor_recent {
        if time_cutoff.is_some() {
            text.push_str("+ ");
        }
        text.push_str("`Prioritize Recently Updated Docs`");
    }

    Some(Block::section(format!("_{}_", text.trim_end())))
}

/// Full answer layout: header, filters, answer, feedback, quotes, divider.
pub fn qa_response_blocks(response: &QaResponse<'_>) -> Vec<Block> {
    let mut blocks = vec![Block::header("AI Answer")];

    if let Some(filters) = filter_block(
        response.source_filters,
        response.time_cutoff,
        response.favor_recent,
    ) {
        blocks.push(filters);
    }

    let mut quote_blocks = Vec::new();
    match response.answer.filter(|a| !a.is_empty()) {
        None => blocks.push(Block::section(NO_ANSWER_TEXT)),
        Some(answer) => {
            // Decode first so escaped markup cannot come back to life after the scrub.
            blocks.push(Block::section(remove_interactions(&decode_escapes(answer))));
            if let Some(quotes) = response.quotes {
                quote_blocks = quotes_block(quotes);
            }
            if quote_blocks.is_empty() {
                quote_blocks.push(Block::section(NO_QUOTES_WARNING));
            }
        }
    }

    if let Some(message_id) = response.message_id {
        blocks.push(qa_feedback_block(message_id));
    }

    if !response.skip_quotes {
        blocks.extend(quote_blocks);
    }
    blocks.push(Block::Divider);

    blocks
}
