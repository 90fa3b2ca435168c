//! Resource implementations
//!
//! Every resource follows the same lifecycle shape: an inner `async fn`
//! per operation returning `Result<_, Diagnostic>`, wrapped by the trait
//! method that turns failures into response diagnostics. A failed create or
//! update hands back the state Terraform already had so nothing is lost.

pub mod bridge;
pub mod chain;
pub mod class;
pub mod delegated_thought;
pub mod directive;
pub mod listener;
pub mod listener_filter;
pub mod modular_thought;
pub mod node;
pub mod prompt;
pub mod source;
pub mod space;
pub mod thought_path;
pub mod thought_tool;
pub mod tool_input;

pub use bridge::SpaceBridgeResource;
pub use chain::ChainResource;
pub use class::ClassResource;
pub use delegated_thought::DelegatedThoughtResource;
pub use directive::ThoughtPathDirectiveResource;
pub use listener::ListenerResource;
pub use listener_filter::ListenerFilterResource;
pub use modular_thought::ModularThoughtResource;
pub use node::NodeResource;
pub use prompt::PromptResource;
pub use source::SourceResource;
pub use space::SpaceResource;
pub use thought_path::ThoughtPathResource;
pub use thought_tool::ThoughtToolResource;
pub use tool_input::ThoughtToolInputResource;

use crate::api::ApiError;
use crate::json_params::{self, JsonObject};
use std::fmt::Display;
use tfplug::context::Context;
use tfplug::plan_modifier::{RequiresReplace, UseStateForUnknown};
use tfplug::resource::{
    CreateResourceResponse, DeleteResourceResponse, ReadResourceResponse, UpdateResourceResponse,
};
use tfplug::schema::{Attribute, AttributeBuilder};
use tfplug::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use tfplug::validator::NumberRange;
use tfplug::TfplugError;

/// Remote failure, surfaced verbatim
pub(crate) fn client_error(verb: &str, entity: &str, err: impl Display) -> Diagnostic {
    Diagnostic::error(
        "Client Error",
        format!("Unable to {} {}, got error: {}", verb, entity, err),
    )
}

/// A read that found nothing means the object was deleted outside Terraform
pub(crate) fn found<T>(
    result: Result<T, ApiError>,
    entity: &str,
    id: &str,
) -> Result<Option<T>, Diagnostic> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => {
            tracing::warn!("{} {} no longer exists, removing from state", entity, id);
            Ok(None)
        }
        Err(e) => Err(client_error("read", entity, e)),
    }
}

/// Deleting something already gone is success
pub(crate) fn deleted(
    result: Result<(), ApiError>,
    entity: &str,
    id: &str,
) -> Result<(), Diagnostic> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => {
            tracing::debug!("{} {} was already deleted", entity, id);
            Ok(())
        }
        Err(e) => Err(client_error("delete", entity, e)),
    }
}

pub(crate) fn create_response(
    result: Result<DynamicValue, Diagnostic>,
    planned_state: DynamicValue,
) -> CreateResourceResponse {
    match result {
        Ok(new_state) => CreateResourceResponse {
            new_state,
            diagnostics: vec![],
        },
        Err(diag) => CreateResourceResponse {
            new_state: planned_state,
            diagnostics: vec![diag],
        },
    }
}

pub(crate) fn read_response(
    result: Result<Option<DynamicValue>, Diagnostic>,
    current_state: DynamicValue,
) -> ReadResourceResponse {
    match result {
        Ok(new_state) => ReadResourceResponse {
            new_state,
            diagnostics: vec![],
        },
        Err(diag) => ReadResourceResponse {
            new_state: Some(current_state),
            diagnostics: vec![diag],
        },
    }
}

pub(crate) fn update_response(
    result: Result<DynamicValue, Diagnostic>,
    prior_state: DynamicValue,
) -> UpdateResourceResponse {
    match result {
        Ok(new_state) => UpdateResourceResponse {
            new_state,
            diagnostics: vec![],
        },
        Err(diag) => UpdateResourceResponse {
            new_state: prior_state,
            diagnostics: vec![diag],
        },
    }
}

pub(crate) fn delete_response(result: Result<(), Diagnostic>) -> DeleteResourceResponse {
    DeleteResourceResponse {
        diagnostics: result.err().into_iter().collect(),
    }
}

pub(crate) fn state_error(err: TfplugError) -> Diagnostic {
    Diagnostic::error("State Error", err.to_string())
}

/// Refuse to start network work for a cancelled request
pub(crate) fn ensure_active(ctx: &Context) -> Result<(), Diagnostic> {
    if ctx.is_cancelled() {
        return Err(Diagnostic::error(
            "Request Cancelled",
            "The operation was cancelled before it reached the Tama API",
        ));
    }
    Ok(())
}

pub(crate) fn required_string(
    value: &DynamicValue,
    path: &AttributePath,
) -> Result<String, Diagnostic> {
    value.get_optional_string(path).ok_or_else(|| {
        Diagnostic::error(
            "Missing Attribute",
            format!("{} must be set and known at this point", path),
        )
        .with_attribute(path.clone())
    })
}

pub(crate) fn required_attr(value: &DynamicValue, name: &str) -> Result<String, Diagnostic> {
    required_string(value, &AttributePath::new(name))
}

pub(crate) fn optional_attr(value: &DynamicValue, name: &str) -> Option<String> {
    value.get_optional_string(&AttributePath::new(name))
}

pub(crate) fn set_string(
    state: &mut DynamicValue,
    name: &str,
    value: impl Into<String>,
) -> tfplug::Result<()> {
    state.set_string(&AttributePath::new(name), value.into())
}

pub(crate) fn set_optional_string(
    state: &mut DynamicValue,
    path: &AttributePath,
    value: Option<String>,
) -> tfplug::Result<()> {
    state.set_value(path, Dynamic::from(value))
}

pub(crate) fn set_optional_number(
    state: &mut DynamicValue,
    path: &AttributePath,
    value: Option<f64>,
) -> tfplug::Result<()> {
    state.set_value(path, Dynamic::from(value))
}

// 2^63, the first whole number an i64 cannot hold
const INDEX_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Index attributes are whole numbers carried as Terraform numbers
pub(crate) fn optional_index(
    value: &DynamicValue,
    name: &str,
) -> Result<Option<i64>, Diagnostic> {
    match value.get_optional_number(&AttributePath::new(name)) {
        None => Ok(None),
        Some(n) if n.fract() == 0.0 && (0.0..INDEX_LIMIT).contains(&n) => Ok(Some(n as i64)),
        Some(n) => Err(Diagnostic::error(
            "Invalid Attribute Value",
            format!("{} must be a non-negative whole number, got {}", name, n),
        )
        .with_attribute(AttributePath::new(name))),
    }
}

/// Parameters object to send for the JSON string at `path`
pub(crate) fn parameters_to_send(
    value: &DynamicValue,
    path: &AttributePath,
) -> Result<Option<JsonObject>, Diagnostic> {
    json_params::to_request(value.get_optional_string(path).as_deref())
        .map_err(|e| json_params::invalid_parameters(path, &e))
}

/// Parameters string to store once the API has answered
///
/// When the reconciled document means the same as `declared`, the stored
/// string is the user's own spelling rather than the canonical form.
pub(crate) fn parameters_to_store(
    declared: Option<String>,
    server: Option<&JsonObject>,
    path: &AttributePath,
) -> Result<Option<String>, Diagnostic> {
    let reconciled = json_params::reconcile(declared.as_deref(), server)
        .map_err(|e| json_params::invalid_parameters(path, &e))?;
    Ok(json_params::keep_declared(declared.as_deref(), reconciled))
}

pub(crate) fn id_attribute(entity: &str) -> Attribute {
    AttributeBuilder::string("id")
        .description(&format!("The {} identifier", entity))
        .computed()
        .plan_modifier(UseStateForUnknown)
        .build()
}

pub(crate) fn provision_state_attribute() -> Attribute {
    AttributeBuilder::string("provision_state")
        .description("The provisioning state reported by Tama")
        .computed()
        .build()
}

/// Position of a thought in its chain, assigned by Tama when omitted
pub(crate) fn index_attribute() -> Attribute {
    AttributeBuilder::number("index")
        .description("Position of the thought in its chain")
        .optional()
        .computed()
        .validator(NumberRange {
            min: Some(0.0),
            max: None,
        })
        .plan_modifier(UseStateForUnknown)
        .build()
}

/// Id of the owning entity; moving to another parent means a new resource
pub(crate) fn parent_attribute(name: &str, description: &str) -> Attribute {
    AttributeBuilder::string(name)
        .description(description)
        .required()
        .plan_modifier(RequiresReplace)
        .build()
}
