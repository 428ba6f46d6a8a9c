pub mod bookings;
pub mod error;
pub mod feedback;
pub mod middleware;

use std::sync::Arc;

use greenroom_db::Database;
use greenroom_gateway::RoomSessions;
use greenroom_schedule::Scheduler;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub scheduler: Scheduler,
    pub sessions: RoomSessions,
    pub jwt_secret: String,
}
