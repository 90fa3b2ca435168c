//! Schema driven validation and planning
//!
//! These functions give resources the framework behaviour Terraform expects
//! without each one walking its configuration by hand:
//!
//! * [`validate_config`] checks required attributes, read-only attributes,
//!   attribute validators and nested block cardinality.
//! * [`plan_resource_change`] applies defaults, marks unset computed values
//!   unknown and runs plan modifiers, collecting replacement paths.

use crate::plan_modifier::{values_equal, PlanModifyRequest};
use crate::schema::{Block, NestedBlock, NestingMode, Schema};
use crate::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};
use std::collections::HashMap;

/// Result of planning a single resource instance
#[derive(Debug, Clone)]
pub struct PlannedChange {
    pub planned_state: DynamicValue,
    pub requires_replace: Vec<AttributePath>,
    pub diagnostics: Vec<Diagnostic>,
}

impl PlannedChange {
    pub fn requires_replace(&self) -> bool {
        !self.requires_replace.is_empty()
    }
}

pub fn validate_config(schema: &Schema, config: &DynamicValue) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    validate_block(
        &schema.block,
        &config.value,
        &AttributePath::root(),
        &mut diagnostics,
    );
    diagnostics
}

fn validate_block(
    block: &Block,
    value: &Dynamic,
    path: &AttributePath,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let empty = HashMap::new();
    let values = value.as_map().unwrap_or(&empty);

    for attr in &block.attributes {
        let attr_path = path.clone().attribute(&attr.name);
        let attr_value = values.get(&attr.name).unwrap_or(&Dynamic::Null);

        if attr_value.is_null() {
            if attr.required {
                diagnostics.push(
                    Diagnostic::error(
                        "Missing required argument",
                        format!(
                            "The argument \"{}\" is required, but no definition was found.",
                            attr_path
                        ),
                    )
                    .with_attribute(attr_path),
                );
            }
            continue;
        }

        if attr.computed && !attr.optional && !attr.required {
            diagnostics.push(
                Diagnostic::error(
                    "Invalid Configuration for Read-Only Attribute",
                    format!(
                        "Cannot set value for attribute {} because it is computed by the provider.",
                        attr_path
                    ),
                )
                .with_attribute(attr_path),
            );
            continue;
        }

        if attr_value.is_unknown() {
            continue;
        }

        for validator in &attr.validators {
            validator.validate(attr_value, &attr_path, diagnostics);
        }
    }

    for nested in &block.block_types {
        let nested_path = path.clone().attribute(&nested.type_name);
        let nested_value = values.get(&nested.type_name).unwrap_or(&Dynamic::Null);
        if nested_value.is_unknown() {
            continue;
        }

        let items: Vec<&Dynamic> = match (nested.nesting, nested_value) {
            (_, Dynamic::Null) => Vec::new(),
            (NestingMode::Single, Dynamic::Map(_)) => vec![nested_value],
            (_, Dynamic::List(items)) => items.iter().collect(),
            (_, other) => {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid Block",
                        format!(
                            "Block {} must be a list of objects, got {}",
                            nested_path,
                            other.type_name()
                        ),
                    )
                    .with_attribute(nested_path),
                );
                continue;
            }
        };

        check_cardinality(nested, items.len(), &nested_path, diagnostics);

        for (i, item) in items.into_iter().enumerate() {
            let item_path = item_path(nested, &nested_path, i);
            validate_block(&nested.block, item, &item_path, diagnostics);
        }
    }
}

fn check_cardinality(
    nested: &NestedBlock,
    count: usize,
    path: &AttributePath,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let count = count as i64;
    if count < nested.min_items {
        diagnostics.push(
            Diagnostic::error(
                format!("Insufficient {} blocks", nested.type_name),
                format!(
                    "At least {} \"{}\" blocks are required.",
                    nested.min_items, nested.type_name
                ),
            )
            .with_attribute(path.clone()),
        );
    }
    if nested.max_items > 0 && count > nested.max_items {
        diagnostics.push(
            Diagnostic::error(
                format!("Too many {} blocks", nested.type_name),
                format!(
                    "No more than {} \"{}\" blocks are allowed.",
                    nested.max_items, nested.type_name
                ),
            )
            .with_attribute(path.clone()),
        );
    }
}

fn item_path(nested: &NestedBlock, path: &AttributePath, index: usize) -> AttributePath {
    match nested.nesting {
        NestingMode::Single => path.clone(),
        NestingMode::List | NestingMode::Set => path.clone().index(index as i64),
    }
}

/// Plan the next state of a resource from its prior state and configuration
///
/// A null configuration plans a destroy. When nothing configurable changed,
/// computed attributes keep their prior values instead of becoming unknown.
pub fn plan_resource_change(
    schema: &Schema,
    prior_state: &DynamicValue,
    config: &DynamicValue,
) -> PlannedChange {
    let mut change = PlannedChange {
        planned_state: DynamicValue::null(),
        requires_replace: Vec::new(),
        diagnostics: Vec::new(),
    };

    if config.is_null() {
        return change;
    }

    let changed = prior_state.is_null()
        || block_config_differs(
            &schema.block,
            &prior_state.value,
            &config.value,
            &AttributePath::root(),
        );

    let planned = plan_block(
        &schema.block,
        &prior_state.value,
        &config.value,
        &AttributePath::root(),
        changed,
        &mut change,
    );
    change.planned_state = DynamicValue::new(planned);
    change
}

fn plan_block(
    block: &Block,
    prior: &Dynamic,
    config: &Dynamic,
    path: &AttributePath,
    changed: bool,
    change: &mut PlannedChange,
) -> Dynamic {
    let empty = HashMap::new();
    let prior_values = prior.as_map().unwrap_or(&empty);
    let config_values = config.as_map().unwrap_or(&empty);
    let mut planned = HashMap::new();

    for attr in &block.attributes {
        let attr_path = path.clone().attribute(&attr.name);
        let state_value = prior_values.get(&attr.name).cloned().unwrap_or(Dynamic::Null);
        let config_value = config_values
            .get(&attr.name)
            .cloned()
            .unwrap_or(Dynamic::Null);

        let mut plan_value = config_value.clone();
        if plan_value.is_null() {
            if let Some(default) = &attr.default {
                plan_value = default.default_value(&attr_path);
            } else if attr.computed {
                plan_value = if changed {
                    Dynamic::Unknown
                } else {
                    state_value.clone()
                };
            }
        }

        for modifier in &attr.plan_modifiers {
            let response = modifier.modify_plan(PlanModifyRequest {
                state: state_value.clone(),
                plan: plan_value,
                config: config_value.clone(),
                path: attr_path.clone(),
            });
            plan_value = response.plan_value;
            if response.requires_replace && !change.requires_replace.contains(&attr_path) {
                change.requires_replace.push(attr_path.clone());
            }
            change.diagnostics.extend(response.diagnostics);
        }

        planned.insert(attr.name.clone(), plan_value);
    }

    for nested in &block.block_types {
        let nested_path = path.clone().attribute(&nested.type_name);
        let prior_value = prior_values
            .get(&nested.type_name)
            .unwrap_or(&Dynamic::Null);
        let config_value = config_values
            .get(&nested.type_name)
            .cloned()
            .unwrap_or(Dynamic::Null);

        let planned_value = match &config_value {
            Dynamic::List(items) => Dynamic::List(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        let prior_item = prior_value
                            .as_list()
                            .and_then(|l| l.get(i))
                            .unwrap_or(&Dynamic::Null);
                        plan_block(
                            &nested.block,
                            prior_item,
                            item,
                            &item_path(nested, &nested_path, i),
                            changed,
                            change,
                        )
                    })
                    .collect(),
            ),
            Dynamic::Map(_) => plan_block(
                &nested.block,
                prior_value,
                &config_value,
                &nested_path,
                changed,
                change,
            ),
            other => other.clone(),
        };

        planned.insert(nested.type_name.clone(), planned_value);
    }

    Dynamic::Map(planned)
}

/// True when any configured value (or applied default) differs from state
///
/// Plan modifiers get a say first, so a value a modifier maps back to the
/// state (such as semantically equal JSON) is not a change.
fn block_config_differs(
    block: &Block,
    prior: &Dynamic,
    config: &Dynamic,
    path: &AttributePath,
) -> bool {
    let empty = HashMap::new();
    let prior_values = prior.as_map().unwrap_or(&empty);
    let config_values = config.as_map().unwrap_or(&empty);

    for attr in &block.attributes {
        let prior_value = prior_values.get(&attr.name).unwrap_or(&Dynamic::Null);
        let config_value = config_values.get(&attr.name).unwrap_or(&Dynamic::Null);

        let attr_path = path.clone().attribute(&attr.name);
        let mut effective = match (config_value, &attr.default) {
            (Dynamic::Null, Some(default)) => default.default_value(&attr_path),
            (Dynamic::Null, None) => continue,
            (value, _) => value.clone(),
        };
        for modifier in &attr.plan_modifiers {
            effective = modifier
                .modify_plan(PlanModifyRequest {
                    state: prior_value.clone(),
                    plan: effective,
                    config: config_value.clone(),
                    path: attr_path.clone(),
                })
                .plan_value;
        }

        if !values_equal(&effective, prior_value) {
            return true;
        }
    }

    for nested in &block.block_types {
        let nested_path = path.clone().attribute(&nested.type_name);
        let prior_value = prior_values
            .get(&nested.type_name)
            .unwrap_or(&Dynamic::Null);
        let config_value = config_values
            .get(&nested.type_name)
            .unwrap_or(&Dynamic::Null);

        match (prior_value, config_value) {
            (Dynamic::List(prior_items), Dynamic::List(config_items)) => {
                if prior_items.len() != config_items.len() {
                    return true;
                }
                if prior_items.iter().zip(config_items).enumerate().any(|(i, (p, c))| {
                    block_config_differs(&nested.block, p, c, &item_path(nested, &nested_path, i))
                }) {
                    return true;
                }
            }
            (Dynamic::Map(_), Dynamic::Map(_)) => {
                if block_config_differs(&nested.block, prior_value, config_value, &nested_path) {
                    return true;
                }
            }
            (Dynamic::Null, Dynamic::Null) => {}
            _ => return true,
        }
    }

    false
}
