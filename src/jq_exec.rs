use anyhow::{Context, Result, anyhow};
use jaq_core::{Compiler, Ctx, RcIter, compile::Undefined, load};
use jaq_json::Val;
use serde_json::Value;
use tracing::trace;

/// Compile `filter_src` once and run it over each document. Every filter
/// output becomes a document of its own, in input order.
pub fn run_jaq(filter_src: &str, documents: Vec<Value>) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader.load(&arena, program).map_err(parse_errors)?;
    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let mut selected = Vec::new();
    for (index, document) in documents.into_iter().enumerate() {
        let before = selected.len();
        for item in filter.run((Ctx::new([], &inputs), Val::from(document))) {
            let val = item.map_err(|e| anyhow!("jq failed on document {index}: {e:?}"))?;
            // Val's Display is JSON text
            let doc = serde_json::from_str(&val.to_string())
                .with_context(|| format!("jq produced a non-JSON value: {val}"))?;
            selected.push(doc);
        }
        trace!(index, outputs = selected.len() - before, "jq applied");
    }
    Ok(selected)
}

fn parse_errors(errs: Vec<(load::File<&str, ()>, load::Error<&str>)>) -> anyhow::Error {
    let lines: Vec<String> = errs
        .into_iter()
        .map(|(file, err)| format!("jq parse error: {err:?} in `{}`", file.code))
        .collect();
    anyhow!(lines.join("\n"))
}

fn undefined_errors(errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>) -> anyhow::Error {
    let lines: Vec<String> = errs
        .into_iter()
        .flat_map(|(file, list)| {
            list.into_iter()
                .map(move |(name, undef)| format!("jq: undefined `{name}`: {undef:?} in `{}`", file.code))
        })
        .collect();
    anyhow!(lines.join("\n"))
}
