//! Final resolution of generator input.
//!
//! Takes the layered [`LoadedInputs`] and produces an [`EffectiveConfig`],
//! prompting for absent required fields when the generator is interactive.

use tracing::debug;

use super::{
    EffectiveConfig, FieldSpec, GeneratorSpec, LoadedInputs, MissingPolicy, Prompter,
    SAMPLE_OVERRIDES_JSON,
};
use crate::error::ConfigError;

/// Resolve one field.
///
/// `layered` is the value from the highest non-interactive layer that
/// supplied one. When it is absent and a prompter is given, the user is
/// asked. Empty answers count as absent.
///
/// # Errors
///
/// Returns [`ConfigError::PromptFailed`] if the prompter fails.
pub fn resolve_field(
    spec: &FieldSpec,
    layered: Option<&str>,
    prompter: Option<&mut dyn Prompter>,
) -> Result<Option<String>, ConfigError> {
    if let Some(value) = layered.filter(|v| !v.is_empty()) {
        return Ok(Some(value.to_owned()));
    }
    let Some(active) = prompter else {
        return Ok(None);
    };
    let answer = active.prompt(spec)?;
    Ok(Some(answer).filter(|v| !v.is_empty()))
}

/// Resolve every field `spec` uses.
///
/// Optional fields are carried over without prompting. Required fields are
/// prompted for when the generator's policy is [`MissingPolicy::Prompt`] and
/// a prompter is available.
///
/// # Errors
///
/// - [`ConfigError::NothingToDo`] when the generator requires input and no
///   layer supplied any.
/// - [`ConfigError::MissingRequired`] naming every required field still
///   absent, in table order.
/// - [`ConfigError::PromptFailed`] if prompting fails.
pub fn resolve(
    spec: &GeneratorSpec,
    loaded: &LoadedInputs,
    mut prompter: Option<&mut dyn Prompter>,
) -> Result<EffectiveConfig, ConfigError> {
    if spec.requires_input && !loaded.supplied {
        return Err(ConfigError::NothingToDo {
            sample: SAMPLE_OVERRIDES_JSON,
        });
    }

    let mut values = Vec::with_capacity(spec.fields.len());
    let mut missing = Vec::new();

    for field_spec in spec.fields {
        let layered = loaded.inputs.get(field_spec.field);
        let may_prompt = field_spec.required && spec.missing == MissingPolicy::Prompt;
        let active: Option<&mut dyn Prompter> = match prompter.as_mut() {
            Some(asker) if may_prompt => Some(&mut **asker),
            _ => None,
        };

        if layered.is_none() && active.is_some() {
            debug!(field = field_spec.name, "prompting for missing field");
        }
        match resolve_field(field_spec, layered, active)? {
            Some(value) => values.push((field_spec.field, value)),
            None if field_spec.required => missing.push(field_spec.name),
            None => {}
        }
    }

    if !missing.is_empty() {
        return Err(ConfigError::MissingRequired {
            field: missing.join(", "),
        });
    }

    Ok(values.into_iter().collect())
}
