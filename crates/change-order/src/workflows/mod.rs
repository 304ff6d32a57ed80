pub mod change_order;
