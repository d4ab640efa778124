// SplitScreen state managers
// Managers handle stateful operations: the page store, the split layout,
// web panels with their address bars, and the favorites list.

pub mod address_bar;
pub mod favorites_list;
pub mod page_store;
pub mod split_layout;
pub mod web_panel;
