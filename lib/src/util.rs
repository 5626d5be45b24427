use log::debug;

use crate::errors::Result;
use crate::graph::Graph;
use crate::term::Triple;

/// Add every triple of `source` to `target`.
pub fn add_into(target: &Graph, source: &Graph) -> Result<()> {
    let triples = source.find(&Triple::any())?.to_vec()?;
    debug!("copying {} triples from {} into {}", triples.len(), source.name(), target.name());
    for t in &triples {
        target.add(t)?;
    }
    Ok(())
}

/// Delete every triple of `source` from `target`.
pub fn delete_from(target: &Graph, source: &Graph) -> Result<()> {
    let triples = source.find(&Triple::any())?.to_vec()?;
    for t in &triples {
        target.delete(t)?;
    }
    Ok(())
}

/// Route `log` output through env_logger in tests; repeated calls are fine.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
