//! The single left-to-right pass populating a target from tokens.

use crate::{
    cursor::{PushBack, Source, Tokens},
    schema::{Binding, Descriptor, Parameter, Schema},
    CoerceError, Error, Result,
};

/// Per-parse bookkeeping; the schema itself is never written to.
struct State {
    present: Vec<bool>,
    floating_index: usize,
}

impl<T: Default> Schema<T> {
    /// Parses `args`, whose first element is the program path.
    ///
    /// Unrecognized tokens are errors; use [`CommandLine`](crate::CommandLine)
    /// to handle them with a callback instead.
    pub fn parse<I, S>(&self, args: I) -> Result<T>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        parse(self, Tokens::new(args), &mut |arg| Err(Error::UnrecognizedToken(arg)))
    }
}

pub(crate) fn parse<T: Default>(
    schema: &Schema<T>,
    mut source: Tokens,
    unrecognized: &mut dyn FnMut(String) -> Result<()>,
) -> Result<T> {
    let mut target = T::default();
    let mut state = State { present: vec![false; schema.parameters.len()], floating_index: 0 };

    if let Some(program) = source.pull() {
        if let Some(binary_path) = &schema.binary_path {
            (binary_path.assign)(&mut target, &program).map_err(|source| Error::Coercion {
                name: binary_path.field.to_string(),
                source,
            })?;
        }
    }

    while let Some(arg) = source.pull() {
        if let Some(idx) = schema.lookup_switch(&arg) {
            tracing::trace!(token = %arg, "switch");
            state.present[idx] = true;
            apply_keyed(&schema.parameters[idx], &mut target, &mut source)?;
        } else if let Some(idx) = schema.lookup_argument(&arg) {
            tracing::trace!(token = %arg, "argument");
            state.present[idx] = true;
            apply_keyed(&schema.parameters[idx], &mut target, &mut source)?;
        } else if let Some(&idx) = schema.floating.get(state.floating_index) {
            tracing::trace!(token = %arg, slot = state.floating_index, "floating");
            state.present[idx] = true;
            let param = &schema.parameters[idx];
            if !param.descriptor.is_list() {
                state.floating_index += 1;
            }
            apply_floating(param, &mut target, arg, &mut source)?;
        } else {
            tracing::trace!(token = %arg, "unrecognized");
            unrecognized(arg)?;
        }
    }

    let missing_among = |floating: bool| {
        schema
            .parameters
            .iter()
            .zip(&state.present)
            .filter(move |(param, &present)| {
                let descriptor = &param.descriptor;
                descriptor.is_floating() == floating && descriptor.is_required() && !present
            })
            .map(|(param, _)| param.descriptor.display_name().to_string())
    };
    // Keyed names come before floating ones.
    let missing = missing_among(false).chain(missing_among(true)).collect::<Vec<_>>();
    if !missing.is_empty() {
        return Err(Error::MissingRequired(missing));
    }

    tracing::debug!(parameters = state.present.iter().filter(|&&it| it).count(), "parsed");
    Ok(target)
}

/// Applies a switch or keyed argument whose name has just been pulled.
fn apply_keyed<T>(param: &Parameter<T>, target: &mut T, source: &mut Tokens) -> Result<()> {
    let descriptor = &param.descriptor;
    let name = descriptor.display_name();
    match &param.binding {
        Binding::Switch(switch_on) => switch_on(target),
        Binding::Group(fill) | Binding::AppendGroup(fill) => {
            let tokens = pull_properties(descriptor, source)?;
            fill(target, &tokens).map_err(coercion(descriptor))?;
        }
        Binding::Append(append) if !descriptor.delimiters().is_empty() => {
            let value = source.pull_value(name)?;
            for item in split(&value, descriptor.delimiters()) {
                append(target, item).map_err(coercion(descriptor))?;
            }
        }
        Binding::Append(append) => {
            let value = source.pull_value(name)?;
            append(target, &value).map_err(coercion(descriptor))?;
        }
        Binding::Scalar(assign) if descriptor.is_remainder() => {
            let value = source.pull_remainder();
            assign(target, &value).map_err(coercion(descriptor))?;
        }
        Binding::Scalar(assign) => {
            let value = source.pull_value(name)?;
            assign(target, &value).map_err(coercion(descriptor))?;
        }
    }
    Ok(())
}

/// Applies a floating argument; `arg` is its first, already pulled, value.
fn apply_floating<T>(
    param: &Parameter<T>,
    target: &mut T,
    arg: String,
    source: &mut Tokens,
) -> Result<()> {
    let descriptor = &param.descriptor;
    match &param.binding {
        Binding::Append(append) => {
            for item in split(&arg, descriptor.delimiters()) {
                append(target, item).map_err(coercion(descriptor))?;
            }
        }
        // No delimited form: delimiters need a list, and floating lists take no properties.
        Binding::Group(fill) | Binding::AppendGroup(fill) => {
            let tokens = pull_properties(descriptor, &mut PushBack::new(arg, source))?;
            fill(target, &tokens).map_err(coercion(descriptor))?;
        }
        Binding::Scalar(assign) => assign(target, &arg).map_err(coercion(descriptor))?,
        Binding::Switch(switch_on) => switch_on(target),
    }
    Ok(())
}

fn pull_properties(descriptor: &Descriptor, source: &mut dyn Source) -> Result<Vec<String>> {
    let name = descriptor.display_name();
    descriptor.properties().iter().map(|_| source.pull_value(name)).collect()
}

fn split<'a>(arg: &'a str, delimiters: &'a [char]) -> impl Iterator<Item = &'a str> {
    arg.split(delimiters).filter(|it| !it.is_empty())
}

fn coercion(descriptor: &Descriptor) -> impl FnOnce(CoerceError) -> Error + '_ {
    move |source| Error::Coercion { name: descriptor.display_name().to_string(), source }
}
