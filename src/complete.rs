//! Shell completion candidates for a partially typed word.

use std::{
    collections::HashSet,
    fs,
    path::{self, Path},
};

use crate::{
    coerce::starts_with_ignore_case,
    schema::{Descriptor, DescriptorKind, Schema},
};

impl<T> Schema<T> {
    /// Candidates for `prefix`, resolving relative paths against the working directory.
    ///
    /// `preceding` holds the words before the one being completed, without
    /// the program name.
    pub fn complete<S: AsRef<str>>(&self, prefix: &str, preceding: &[S]) -> Vec<String> {
        self.complete_in(Path::new("."), prefix, preceding)
    }

    /// Like [`complete`](Self::complete), with relative paths resolved against `base`.
    pub fn complete_in<S: AsRef<str>>(
        &self,
        base: &Path,
        prefix: &str,
        preceding: &[S],
    ) -> Vec<String> {
        let mut specified = HashSet::new();
        let mut floating_index = 0;
        let mut pending = None;

        let mut i = 0;
        while i < preceding.len() {
            let word = preceding[i].as_ref();
            i += 1;
            if let Some(idx) = self.lookup_argument(word) {
                specified.insert(idx);
                let descriptor = self.descriptor(idx);
                if descriptor.is_remainder() {
                    pending = Some((descriptor, 0));
                    break;
                }
                let remaining = preceding.len() - i;
                if remaining < descriptor.arity() {
                    pending = Some((descriptor, remaining));
                    break;
                }
                i += descriptor.arity();
            } else if let Some(idx) = self.lookup_switch(word) {
                // Switches leave the floating counter alone, as they do when parsing.
                specified.insert(idx);
            } else if let Some(&idx) = self.floating.get(floating_index) {
                if !self.descriptor(idx).is_list() {
                    floating_index += 1;
                }
            }
        }

        let candidates = match pending {
            Some((descriptor, property)) => value_candidates(descriptor, property, prefix, base),
            None => {
                let mut candidates = Vec::new();
                for kind in [DescriptorKind::Switch, DescriptorKind::Argument] {
                    candidates.extend(
                        self.parameters
                            .iter()
                            .enumerate()
                            .filter(|(_, it)| is_keyed_kind(it.descriptor.kind(), kind))
                            .filter(|(idx, it)| {
                                let repeatable =
                                    it.descriptor.is_counter() || it.descriptor.is_list();
                                repeatable || !specified.contains(idx)
                            })
                            .filter_map(|(_, it)| it.descriptor.switch())
                            .filter(|switch| starts_with_ignore_case(switch, prefix))
                            .map(String::from),
                    );
                }
                if let Some(&idx) = self.floating.get(floating_index) {
                    candidates.extend(value_candidates(self.descriptor(idx), 0, prefix, base));
                }
                candidates
            }
        };

        tracing::debug!(prefix, candidates = candidates.len(), "completed");
        candidates
    }
}

/// Completer and register-completer arguments are offered alongside plain arguments.
fn is_keyed_kind(kind: DescriptorKind, wanted: DescriptorKind) -> bool {
    match wanted {
        DescriptorKind::Switch => kind == DescriptorKind::Switch,
        _ => kind != DescriptorKind::Switch,
    }
}

fn value_candidates(
    descriptor: &Descriptor,
    property: usize,
    prefix: &str,
    base: &Path,
) -> Vec<String> {
    if let Some(candidates) = descriptor.complete_with() {
        return candidates.to_vec();
    }
    let variants = descriptor.variants(property);
    if !variants.is_empty() {
        return variants
            .iter()
            .filter(|it| starts_with_ignore_case(it, prefix))
            .map(|it| it.to_string())
            .collect();
    }
    filesystem_candidates(
        base,
        prefix,
        descriptor.completes_files(),
        descriptor.completes_directories(),
    )
}

fn filesystem_candidates(base: &Path, prefix: &str, files: bool, directories: bool) -> Vec<String> {
    let mut candidates = Vec::new();
    if !files && !directories {
        return candidates;
    }
    if directories {
        candidates.extend(
            [".", ".."].iter().filter(|it| it.starts_with(prefix)).map(|it| it.to_string()),
        );
    }

    let (container, name_prefix) = match prefix.rfind(path::is_separator) {
        Some(idx) => (&prefix[..=idx], &prefix[idx + 1..]),
        None => ("", prefix),
    };
    let dir = if container.is_empty() { base.to_path_buf() } else { base.join(container) };
    let entries = match fs::read_dir(&dir) {
        Ok(it) => it,
        Err(_) => return candidates,
    };

    let mut names = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let is_dir = entry.path().is_dir();
            if is_dir {
                directories
            } else {
                files
            }
        })
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(name_prefix))
        .collect::<Vec<_>>();
    names.sort();
    candidates.extend(names.into_iter().map(|name| format!("{}{}", container, name)));
    candidates
}
