// Copyright 2024 The ActiveMQ Manager Authors
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

//! # ActiveMQ Manager Error Handling
//!
//! Every public operation of the manager returns [`ActiveMQResult`]. Failures fall into
//! five categories:
//!
//! - [`TransportError`]: the HTTP round trip itself failed (not retried here)
//! - [`RemoteOperationError`]: the broker answered with an error status for the operation
//! - [`DecodeError`]: the reply or page did not have the expected shape
//! - [`ActiveMQError::NotFound`]: a lookup matched nothing
//! - [`ActiveMQError::Timeout`]: an aggregate fan-out deadline expired
//!
//! ```rust
//! use activemq_error::ActiveMQError;
//! use activemq_error::ActiveMQResult;
//!
//! fn lookup(name: &str) -> ActiveMQResult<()> {
//!     if name.is_empty() {
//!         return Err(ActiveMQError::not_found("queue", name));
//!     }
//!     Ok(())
//! }
//! # lookup("orders").unwrap();
//! ```

pub mod unified;

pub use unified::ActiveMQError;
pub use unified::ActiveMQResult;
pub use unified::DecodeError;
pub use unified::RemoteOperationError;
pub use unified::TransportError;
pub use unified::INSTANCE_NOT_FOUND;
