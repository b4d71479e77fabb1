//! The context threaded through one evaluation pass: the autodiff arena, the
//! computation dictionary, the varying-map override, optional gradient debug info,
//! pass config, and (when `EvalConfig::detect_cycles` is set) the cycle-guard
//! visiting set (§4.4, §4.5.1).

use std::collections::HashSet;

use transeval_common::Path;

use crate::config::EvalConfig;
use crate::dictionary::{Dictionary, DebugInfo};
use crate::tape::Tape;
use crate::varying::VaryingMap;

pub struct EvalContext<'a> {
    pub tape: &'a mut Tape,
    pub dict: &'a Dictionary,
    pub varying: Option<&'a VaryingMap>,
    pub debug: Option<&'a DebugInfo>,
    pub config: &'a EvalConfig,
    pub visiting: Option<&'a mut HashSet<Path>>,
}

impl<'a> EvalContext<'a> {
    /// Enter `p` for the optional cycle guard (§4.5.1); `Ok` continues, `Err` means
    /// `p` is already being resolved higher up the call stack.
    pub fn enter(&mut self, p: &Path) -> transeval_common::Result<()> {
        if !self.config.detect_cycles {
            return Ok(());
        }
        if let Some(visiting) = self.visiting.as_mut() {
            if !visiting.insert(p.clone()) {
                return Err(transeval_common::EvalError::new(
                    transeval_common::EvalErrorKind::CyclicPath,
                )
                .with_path(p.clone()));
            }
        }
        Ok(())
    }

    pub fn exit(&mut self, p: &Path) {
        if !self.config.detect_cycles {
            return;
        }
        if let Some(visiting) = self.visiting.as_mut() {
            visiting.remove(p);
        }
    }
}
