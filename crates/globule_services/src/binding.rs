//! Host binding
//!
//! The two functions host application code can call. Arguments arrive as
//! loosely typed values; anything malformed is logged and dropped, so a bad
//! call never reaches simulation or render state and the caller never sees
//! an error.

use globule_render::{GpuBackend, SurfaceId, SurfaceRegistry};
use thiserror::Error;

/// One argument as passed by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum BindingValue {
    /// Opaque handle naming a surface.
    Handle(SurfaceId),
    Number(f64),
    Text(String),
    Null,
}

impl BindingValue {
    fn kind(&self) -> &'static str {
        match self {
            BindingValue::Handle(_) => "handle",
            BindingValue::Number(_) => "number",
            BindingValue::Text(_) => "text",
            BindingValue::Null => "null",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum BindingError {
    #[error("{call}: wrong argument count (expected {expected}, got {got})")]
    ArgumentCount {
        call: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{call}: argument {index} should be a {expected}, got {got}")]
    ArgumentType {
        call: &'static str,
        index: usize,
        expected: &'static str,
        got: &'static str,
    },

    #[error("{call}: unwrap failed, no surface '{id}'")]
    UnknownSurface { call: &'static str, id: SurfaceId },
}

const ADD_METABALL: &str = "addMetaball";
const CLEAR_METABALLS: &str = "clearMetaballs";

/// `addMetaball(surfaceHandle, x, y)`: spawn at surface-local `(x, y)` with
/// the default radius.
pub fn add_metaball<B: GpuBackend>(registry: &SurfaceRegistry<B>, args: &[BindingValue]) {
    if let Err(err) = try_add_metaball(registry, args) {
        tracing::error!(error = %err, "Binding call rejected");
    }
}

/// `clearMetaballs(surfaceHandle)`: remove every ball on the surface.
pub fn clear_metaballs<B: GpuBackend>(registry: &SurfaceRegistry<B>, args: &[BindingValue]) {
    if let Err(err) = try_clear_metaballs(registry, args) {
        tracing::error!(error = %err, "Binding call rejected");
    }
}

/// `add_metaball` with the rejection reason returned instead of logged.
pub fn try_add_metaball<B: GpuBackend>(
    registry: &SurfaceRegistry<B>,
    args: &[BindingValue],
) -> Result<(), BindingError> {
    expect_count(ADD_METABALL, args, 3)?;
    let id = expect_handle(ADD_METABALL, args, 0)?;
    let x = expect_number(ADD_METABALL, args, 1)?;
    let y = expect_number(ADD_METABALL, args, 2)?;

    let surface = registry
        .get(id)
        .ok_or_else(|| BindingError::UnknownSurface {
            call: ADD_METABALL,
            id: id.clone(),
        })?;
    if surface.spawn_at(x, y) {
        tracing::info!(surface = %id, x, y, "Metaball added");
    }
    Ok(())
}

/// `clear_metaballs` with the rejection reason returned instead of logged.
pub fn try_clear_metaballs<B: GpuBackend>(
    registry: &SurfaceRegistry<B>,
    args: &[BindingValue],
) -> Result<(), BindingError> {
    expect_count(CLEAR_METABALLS, args, 1)?;
    let id = expect_handle(CLEAR_METABALLS, args, 0)?;

    let surface = registry
        .get(id)
        .ok_or_else(|| BindingError::UnknownSurface {
            call: CLEAR_METABALLS,
            id: id.clone(),
        })?;
    surface.clear();
    Ok(())
}

fn expect_count(
    call: &'static str,
    args: &[BindingValue],
    expected: usize,
) -> Result<(), BindingError> {
    if args.len() < expected {
        return Err(BindingError::ArgumentCount {
            call,
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

fn expect_handle<'a>(
    call: &'static str,
    args: &'a [BindingValue],
    index: usize,
) -> Result<&'a SurfaceId, BindingError> {
    match &args[index] {
        BindingValue::Handle(id) => Ok(id),
        other => Err(BindingError::ArgumentType {
            call,
            index,
            expected: "handle",
            got: other.kind(),
        }),
    }
}

/// Surface coordinates are `f32`; a value that overflows the narrowing is
/// rejected like any other non-finite number.
fn expect_number(
    call: &'static str,
    args: &[BindingValue],
    index: usize,
) -> Result<f32, BindingError> {
    let arg = &args[index];
    let narrowed = match arg {
        BindingValue::Number(value) => Some(*value as f32),
        _ => None,
    };
    match narrowed {
        Some(value) if value.is_finite() => Ok(value),
        _ => Err(BindingError::ArgumentType {
            call,
            index,
            expected: "finite number",
            got: arg.kind(),
        }),
    }
}
