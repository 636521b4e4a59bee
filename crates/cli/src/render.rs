//! Terminal rendering for turns and citations.

use ragchat_chat::{ChatSession, ChatTurn};
use ragchat_knowledge::{citations_for, Citation, RetrievedPassage};
use ragchat_llm::Role;
use std::io::{self, Write};

const TURN_TIME_FORMAT: &str = "%H:%M:%S";
const SESSION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Write one turn followed by its sources, if any.
pub fn write_turn(out: &mut impl Write, turn: &ChatTurn) -> io::Result<()> {
    let speaker = match turn.role() {
        Role::User => "You",
        Role::Assistant => "Assistant",
    };
    writeln!(
        out,
        "[{}] {}: {}",
        turn.created_at().format(TURN_TIME_FORMAT),
        speaker,
        turn.content()
    )?;

    if !turn.passages().is_empty() {
        write_sources(out, turn.passages())?;
    }
    Ok(())
}

/// Write every turn of the session in order.
pub fn write_history(out: &mut impl Write, session: &ChatSession) -> io::Result<()> {
    writeln!(
        out,
        "Session started {}",
        session.started_at().format(SESSION_TIME_FORMAT)
    )?;
    if session.is_empty() {
        writeln!(out, "(no messages yet)")?;
        return Ok(());
    }

    for turn in session.turns() {
        write_turn(out, turn)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Write the citation list for a set of passages.
pub fn write_sources(out: &mut impl Write, passages: &[RetrievedPassage]) -> io::Result<()> {
    writeln!(out, "Sources:")?;
    for citation in citations_for(passages) {
        write_citation(out, &citation)?;
    }
    Ok(())
}

fn write_citation(out: &mut impl Write, citation: &Citation) -> io::Result<()> {
    writeln!(
        out,
        "  Source {} (Relevance: {})",
        citation.index, citation.relevance
    )?;
    writeln!(out, "    Document: {}", citation.document)?;
    writeln!(out, "    S3 Location: {}", citation.location)?;
    writeln!(out, "    Content Preview: {}", citation.preview)?;

    if !citation.metadata.is_empty() {
        let metadata = serde_json::to_string(&citation.metadata).map_err(io::Error::other)?;
        writeln!(out, "    Metadata: {}", metadata)?;
    }
    Ok(())
}
