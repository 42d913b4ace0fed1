use fleetpath_core::define_index_newtype;

use crate::route::Route;

define_index_newtype!(VehicleIdx, Route);
