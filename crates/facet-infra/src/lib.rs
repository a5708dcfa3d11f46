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

//! # Facet Infra
//!
//! Concrete implementations of the device contracts declared in `facet-core`.
//!
//! The only backend shipped today is the headless [`RecordingDevice`], which
//! keeps every resource in CPU memory and records each context call into a
//! command trace. It powers the test suites, the benchmarks and the sandbox.

#![warn(missing_docs)]

pub mod graphics;

pub use graphics::recording::{DeviceCommand, RecordingContext, RecordingDevice};
