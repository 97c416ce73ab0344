//! Interactive tree widget state core.
//!
//! Normalizes loosely-typed node records into an arena-backed canonical
//! model and exposes the operations a visual tree widget needs: selection
//! (single, independent multi, batch cascade), asynchronous lazy loading of
//! children via a placeholder-then-replace protocol, and drag-and-drop
//! reparenting with validity checks. Rendering, pointer-event capture, and
//! the actual fetch transport stay outside; the host drives gestures in and
//! reads node state plus the event queue back out.
//!
//! ```
//! use arbor::{Tree, TreeConfig};
//! use serde_json::json;
//!
//! let mut tree = Tree::new(TreeConfig::default());
//! tree.set_data(
//!     json!([{"text": "root", "children": [{"text": "leaf"}]}])
//!         .as_array()
//!         .unwrap(),
//! );
//! let root = tree.root_ids()[0];
//! tree.on_click(root);
//! assert_eq!(tree.selected_ids(), vec![root]);
//! ```

pub mod arena;
pub mod config;
pub mod display;
pub mod drag;
pub mod error;
pub mod events;
pub mod ident;
pub mod load;
pub mod node;
pub mod normalize;
pub mod select;
pub mod tree;
pub mod util;

pub use arena::{TreeArena, TreeNode};
pub use config::TreeConfig;
pub use display::TreeRender;
pub use drag::DragSession;
pub use error::{TreeError, TreeResult};
pub use events::TreeEvent;
pub use ident::{IdGenerator, NodeId};
pub use load::{LoadRequest, LoadTarget};
pub use node::NodeData;
pub use tree::Tree;
