//! Operation logging macros
//!
//! An operation logs one `start` event and then either `end` or
//! `end_error`. Every event carries `component`, `op` and `event`; extra
//! `tracing` fields may follow.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:expr, $($field:tt)*) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event,
            $($field)*
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use snapmark_core::log_op_start;
/// log_op_start!("load_snapshot", path = "a.test.md");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            snapmark_core_types::schema::EVENT_START,
            $($($field)*)?
        )
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use snapmark_core::log_op_end;
/// log_op_end!("persist_snapshots", duration_ms = 42, written = 1);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            snapmark_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// Log a failed operation with the stable code of its error
///
/// ```
/// # use snapmark_core::log_op_error;
/// # use snapmark_core::errors::{ExError, ExErrorKind};
/// log_op_error!("load_snapshot", ExError::new(ExErrorKind::Io), duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error,
            $op,
            snapmark_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
        )
    }};
}
