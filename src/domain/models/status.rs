#[cfg(test)]
#[path = "status_test.rs"]
mod tests;

use strum::EnumIter;
use strum::IntoEnumIterator;

use super::BoaError;
use super::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, strum::Display)]
pub enum CompilerStatus {
    Waiting,
    Running,
    Finished,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, strum::Display)]
pub enum ExecutionStatus {
    Waiting,
    Running,
    Finished,
    Error,
}

impl CompilerStatus {
    pub fn is_terminal(&self) -> bool {
        return matches!(self, CompilerStatus::Finished | CompilerStatus::Error);
    }

    /// Finished and Error share the top rank since both are terminal.
    fn rank(&self) -> u8 {
        match self {
            CompilerStatus::Waiting => return 0,
            CompilerStatus::Running => return 1,
            CompilerStatus::Finished | CompilerStatus::Error => return 2,
        }
    }
}

impl ExecutionStatus {
    pub fn is_terminal(&self) -> bool {
        return matches!(self, ExecutionStatus::Finished | ExecutionStatus::Error);
    }

    fn rank(&self) -> u8 {
        match self {
            ExecutionStatus::Waiting => return 0,
            ExecutionStatus::Running => return 1,
            ExecutionStatus::Finished | ExecutionStatus::Error => return 2,
        }
    }
}

/// Decodes a wire compiler status. Matching is exact and case sensitive.
pub fn parse_compiler_status(raw: &str) -> Result<CompilerStatus> {
    return CompilerStatus::iter()
        .find(|e| return e.to_string() == raw)
        .ok_or_else(|| {
            return BoaError::Protocol(format!("Unrecognized compiler status '{raw}'"));
        });
}

/// Decodes a wire execution status. Matching is exact and case sensitive.
pub fn parse_execution_status(raw: &str) -> Result<ExecutionStatus> {
    return ExecutionStatus::iter()
        .find(|e| return e.to_string() == raw)
        .ok_or_else(|| {
            return BoaError::Protocol(format!("Unrecognized execution status '{raw}'"));
        });
}

/// Both phases of a job. Execution only leaves `Waiting` once compilation
/// has finished, and neither phase moves backwards or leaves a terminal value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JobState {
    pub compiler: CompilerStatus,
    pub execution: ExecutionStatus,
}

impl JobState {
    pub fn new(compiler: CompilerStatus, execution: ExecutionStatus) -> JobState {
        return JobState {
            compiler,
            execution,
        };
    }

    pub fn parse(compiler: &str, execution: &str) -> Result<JobState> {
        let state = JobState::new(
            parse_compiler_status(compiler)?,
            parse_execution_status(execution)?,
        );
        state.validate()?;
        return Ok(state);
    }

    pub fn validate(&self) -> Result<()> {
        if self.compiler != CompilerStatus::Finished && self.execution != ExecutionStatus::Waiting
        {
            return Err(BoaError::Protocol(format!(
                "Execution status {} is impossible while compiler status is {}",
                self.execution, self.compiler
            )));
        }

        return Ok(());
    }

    /// Verifies `next` is reachable from `self` on the lattice.
    pub fn check_transition(&self, next: &JobState) -> Result<()> {
        next.validate()?;

        let compiler_regressed = if self.compiler.is_terminal() {
            next.compiler != self.compiler
        } else {
            next.compiler.rank() < self.compiler.rank()
        };
        if compiler_regressed {
            return Err(BoaError::Protocol(format!(
                "Compiler status regressed from {} to {}",
                self.compiler, next.compiler
            )));
        }

        let execution_regressed = if self.execution.is_terminal() {
            next.execution != self.execution
        } else {
            next.execution.rank() < self.execution.rank()
        };
        if execution_regressed {
            return Err(BoaError::Protocol(format!(
                "Execution status regressed from {} to {}",
                self.execution, next.execution
            )));
        }

        return Ok(());
    }

    pub fn is_running(&self) -> bool {
        return match self.compiler {
            CompilerStatus::Waiting | CompilerStatus::Running => true,
            CompilerStatus::Finished => !self.execution.is_terminal(),
            CompilerStatus::Error => false,
        };
    }

    pub fn is_terminal(&self) -> bool {
        return !self.is_running();
    }
}
