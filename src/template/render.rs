use crate::condition::eval;
use crate::error::EvalError;
use crate::params::Params;
use crate::template::structure::{ConditionalBlock, Segment, Structure};

/// Resolve every conditional block against `params` and assemble the
/// surviving literal spans, in source order, joined by newlines. Dropped
/// branches are removed entirely and their conditions (including nested
/// blocks) are never evaluated.
pub fn select(structure: &Structure, params: &Params) -> Result<String, EvalError> {
    let mut kept: Vec<&str> = Vec::new();
    collect(&structure.segments, params, &mut kept)?;
    Ok(kept.join("\n"))
}

fn collect<'a>(
    segments: &'a [Segment],
    params: &Params,
    kept: &mut Vec<&'a str>,
) -> Result<(), EvalError> {
    for segment in segments {
        match segment {
            Segment::Literal(text) => kept.push(text),
            Segment::Conditional(block) => {
                if let Some(body) = choose_branch(block, params)? {
                    collect(body, params, kept)?;
                }
            }
        }
    }
    Ok(())
}

/// First branch whose condition holds wins; otherwise the `#else` body;
/// otherwise the block contributes nothing.
fn choose_branch<'a>(
    block: &'a ConditionalBlock,
    params: &Params,
) -> Result<Option<&'a [Segment]>, EvalError> {
    for branch in &block.branches {
        if eval(&branch.condition, params)? {
            return Ok(Some(&branch.body));
        }
    }
    Ok(block.else_branch.as_deref())
}
