// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Errors raised while resolving techniques and passes.

use thiserror::Error;

/// A configuration error in technique or pass lookup.
///
/// Render cores recover from these locally by substituting the null pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TechniqueError {
    /// The technique has no pass with the requested name.
    #[error("technique '{technique}' has no pass named '{pass}'")]
    PassNotFound {
        /// Name of the technique that was searched.
        technique: String,
        /// The requested pass name.
        pass: String,
    },
    /// No technique with this name is registered.
    #[error("no technique named '{0}' is registered")]
    UnknownTechnique(String),
}
