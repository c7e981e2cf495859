pub mod auth_routes;
pub mod consignment_routes;
pub mod region_routes;
pub mod voucher_routes;
