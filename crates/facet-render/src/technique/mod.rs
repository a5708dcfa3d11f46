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

//! Techniques and the named shader passes they contain.

use crate::error::TechniqueError;
use facet_core::renderer::{
    DeviceContext, FixedFunctionState, InputLayoutId, ShaderProgramId, StateBindingProfile,
};
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

static NULL_PASS: ShaderPass = ShaderPass::NULL;

struct PassInner {
    name: String,
    program: ShaderProgramId,
    states: FixedFunctionState,
}

/// A bindable shader program plus the fixed-function state that goes with it.
///
/// Cloning is cheap. [`ShaderPass::NULL`] stands for "no pass"; binding it does
/// nothing. Two passes compare equal only if they are clones of the same pass.
#[derive(Clone, Default)]
pub struct ShaderPass(Option<Arc<PassInner>>);

impl ShaderPass {
    /// The null pass.
    pub const NULL: ShaderPass = ShaderPass(None);

    /// Creates a named pass.
    pub fn new(name: impl Into<String>, program: ShaderProgramId, states: FixedFunctionState) -> Self {
        Self(Some(Arc::new(PassInner {
            name: name.into(),
            program,
            states,
        })))
    }

    /// Returns `true` for the null pass.
    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    /// The pass name, or `"NULL"` for the null pass.
    pub fn name(&self) -> &str {
        self.0.as_ref().map_or("NULL", |inner| inner.name.as_str())
    }

    /// The shader program, unless this is the null pass.
    pub fn program(&self) -> Option<ShaderProgramId> {
        self.0.as_ref().map(|inner| inner.program)
    }

    /// The fixed-function state, unless this is the null pass.
    pub fn states(&self) -> Option<&FixedFunctionState> {
        self.0.as_ref().map(|inner| &inner.states)
    }

    /// Binds the shader stages of this pass.
    pub fn bind_shader(&self, context: &mut dyn DeviceContext) {
        if let Some(inner) = &self.0 {
            context.bind_shader(inner.program);
        }
    }

    /// Binds the part of the fixed-function state selected by `profile`.
    pub fn bind_states(&self, context: &mut dyn DeviceContext, profile: StateBindingProfile) {
        if let Some(inner) = &self.0 {
            context.bind_states(&inner.states, profile);
        }
    }
}

impl PartialEq for ShaderPass {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for ShaderPass {}

impl fmt::Debug for ShaderPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            None => f.write_str("ShaderPass(NULL)"),
            Some(inner) => f
                .debug_struct("ShaderPass")
                .field("name", &inner.name)
                .field("program", &inner.program)
                .field("states", &inner.states)
                .finish(),
        }
    }
}

/// A named set of shader passes sharing one vertex input layout.
#[derive(Debug)]
pub struct Technique {
    name: String,
    layout: InputLayoutId,
    passes: HashMap<String, ShaderPass>,
}

impl Technique {
    /// Starts building a technique whose vertex shaders consume `layout`.
    pub fn builder(name: impl Into<String>, layout: InputLayoutId) -> TechniqueBuilder {
        TechniqueBuilder {
            technique: Technique {
                name: name.into(),
                layout,
                passes: HashMap::new(),
            },
        }
    }

    /// The technique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The vertex input layout shared by all passes.
    pub fn layout(&self) -> InputLayoutId {
        self.layout
    }

    /// A technique without passes cannot be attached.
    pub fn is_valid(&self) -> bool {
        !self.passes.is_empty()
    }

    /// Looks up a pass by name.
    ///
    /// ## Errors
    /// * `TechniqueError::PassNotFound` - If no pass has that name.
    pub fn pass(&self, name: &str) -> Result<&ShaderPass, TechniqueError> {
        self.passes
            .get(name)
            .ok_or_else(|| TechniqueError::PassNotFound {
                technique: self.name.clone(),
                pass: name.to_string(),
            })
    }

    /// Looks up a pass by name, substituting the null pass if it does not exist.
    pub fn pass_or_null(&self, name: &str) -> ShaderPass {
        match self.pass(name) {
            Ok(pass) => pass.clone(),
            Err(e) => {
                log::warn!("{e}; using the null pass.");
                ShaderPass::NULL
            }
        }
    }
}

impl Index<&str> for Technique {
    type Output = ShaderPass;

    /// Returns the named pass, or the null pass if there is none.
    fn index(&self, name: &str) -> &ShaderPass {
        self.passes.get(name).unwrap_or(&NULL_PASS)
    }
}

/// Builder returned by [`Technique::builder`].
#[derive(Debug)]
pub struct TechniqueBuilder {
    technique: Technique,
}

impl TechniqueBuilder {
    /// Adds a pass. A pass with the same name is replaced.
    pub fn pass(
        mut self,
        name: impl Into<String>,
        program: ShaderProgramId,
        states: FixedFunctionState,
    ) -> Self {
        let name = name.into();
        let pass = ShaderPass::new(name.clone(), program, states);
        self.technique.passes.insert(name, pass);
        self
    }

    /// Finishes the technique.
    pub fn build(self) -> Technique {
        self.technique
    }
}

/// Techniques by name. Replaces the global effects manager lookup.
#[derive(Debug, Default)]
pub struct TechniqueRegistry {
    techniques: HashMap<String, Arc<Technique>>,
}

impl TechniqueRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `technique` under its name and returns the shared instance.
    pub fn register(&mut self, technique: Technique) -> Arc<Technique> {
        let technique = Arc::new(technique);
        if self
            .techniques
            .insert(technique.name.clone(), Arc::clone(&technique))
            .is_some()
        {
            log::warn!("Technique '{}' was registered twice; the old one is replaced.", technique.name);
        }
        technique
    }

    /// Looks up a technique by name.
    ///
    /// ## Errors
    /// * `TechniqueError::UnknownTechnique` - If nothing is registered under `name`.
    pub fn get(&self, name: &str) -> Result<Arc<Technique>, TechniqueError> {
        self.techniques
            .get(name)
            .cloned()
            .ok_or_else(|| TechniqueError::UnknownTechnique(name.to_string()))
    }

    /// Number of registered techniques.
    pub fn len(&self) -> usize {
        self.techniques.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.techniques.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_core::renderer::{BlendStateId, DepthStencilStateId};
    use facet_infra::{DeviceCommand, RecordingContext};

    fn mesh_technique() -> Technique {
        let states = FixedFunctionState {
            blend: Some(BlendStateId(1)),
            depth_stencil: Some(DepthStencilStateId(2)),
            ..Default::default()
        };
        Technique::builder("Mesh", InputLayoutId(0))
            .pass("Default", ShaderProgramId(10), states)
            .pass("RenderShadow", ShaderProgramId(11), states)
            .build()
    }

    #[test]
    fn unknown_pass_resolves_to_null() {
        let technique = mesh_technique();
        assert!(technique["Missing"].is_null());
        assert!(technique.pass_or_null("Missing").is_null());
        assert_eq!(
            technique.pass("Missing").err(),
            Some(TechniqueError::PassNotFound {
                technique: "Mesh".to_string(),
                pass: "Missing".to_string(),
            })
        );
        assert_eq!(technique["Default"].name(), "Default");
    }

    #[test]
    fn pass_equality_is_identity() {
        let technique = mesh_technique();
        let a = technique.pass_or_null("Default");
        assert_eq!(a, technique["Default"]);
        assert_ne!(a, technique["RenderShadow"]);
        assert_eq!(ShaderPass::NULL, ShaderPass::default());
    }

    #[test]
    fn null_pass_binds_nothing() {
        let mut context = RecordingContext::new();
        ShaderPass::NULL.bind_shader(&mut context);
        ShaderPass::NULL.bind_states(&mut context, StateBindingProfile::COLOR);
        assert!(context.commands().is_empty());

        let technique = mesh_technique();
        technique["RenderShadow"].bind_shader(&mut context);
        technique["RenderShadow"].bind_states(&mut context, StateBindingProfile::SHADOW);
        assert_eq!(context.commands()[0], DeviceCommand::BindShader(ShaderProgramId(11)));
        match &context.commands()[1] {
            DeviceCommand::BindStates { state, profile } => {
                assert_eq!(*profile, StateBindingProfile::SHADOW);
                assert_eq!(state.blend, None);
            }
            other => panic!("unexpected command {other}"),
        }
    }

    #[test]
    fn registry_lookup() {
        let mut registry = TechniqueRegistry::new();
        registry.register(mesh_technique());
        assert!(registry.get("Mesh").is_ok());
        assert_eq!(
            registry.get("Points").err(),
            Some(TechniqueError::UnknownTechnique("Points".to_string()))
        );
    }
}
