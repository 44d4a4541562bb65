//! Route guard driven by real session checks

use std::sync::Arc;

use finboard::session::{Chrome, GuardDecision, Navigator};
use finboard::shared::Route;
use pretty_assertions::assert_eq;

use crate::common::{spawn_app, user_json};
use crate::assert_redirects;

#[tokio::test]
async fn test_no_redirect_while_loading() {
    let app = spawn_app("/history").await;
    let guard = Arc::new(app.manager.guard());
    guard.watch();

    assert_eq!(guard.evaluate(), GuardDecision::Loading);
    assert_eq!(guard.on_navigate("/accounts"), GuardDecision::Loading);
    assert_redirects!(app.navigator);
}

#[tokio::test]
async fn test_unauthenticated_user_is_sent_to_login() {
    let app = spawn_app("/expenses/12").await;
    app.mount_me_status(401).await;
    let guard = Arc::new(app.manager.guard());
    guard.watch();

    app.manager.check_session().await;
    assert_redirects!(app.navigator, "/login");
    assert_eq!(
        guard.evaluate(),
        GuardDecision::Render {
            route: Route::Login,
            chrome: Chrome::NONE
        }
    );
}

#[tokio::test]
async fn test_employee_gets_navbar_without_sidebar() {
    let app = spawn_app("/employees/7").await;
    app.mount_me(user_json(7, "petro", "USER")).await;
    let guard = Arc::new(app.manager.guard());
    guard.watch();

    app.manager.check_session().await;
    assert_eq!(
        guard.evaluate(),
        GuardDecision::Render {
            route: Route::Employee { employee_id: 7 },
            chrome: Chrome {
                navbar: true,
                admin_sidebar: false
            }
        }
    );
    assert_redirects!(app.navigator);
}

#[tokio::test]
async fn test_admin_gets_sidebar() {
    let app = spawn_app("/").await;
    app.mount_me(user_json(1, "root", "ADMIN")).await;
    let guard = Arc::new(app.manager.guard());

    app.manager.check_session().await;
    let decision = guard.evaluate();
    assert_eq!(decision.chrome(), Chrome { navbar: true, admin_sidebar: true });
}

#[tokio::test]
async fn test_public_pages_render_for_everyone() {
    let app = spawn_app("/register").await;
    app.mount_me_status(401).await;
    let guard = Arc::new(app.manager.guard());
    guard.watch();

    app.manager.check_session().await;
    assert_redirects!(app.navigator);
    assert_eq!(app.navigator.current_path(), "/register");
    assert_eq!(guard.on_navigate("/login?next=%2F").chrome(), Chrome::NONE);
}
