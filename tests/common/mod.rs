//! Common test utilities: a mock intranet and its pages
#![allow(dead_code)]

use padel_booker::config::Config;
use padel_booker::credentials::StaticCredentialProvider;
use padel_booker::models::Credentials;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LOGIN_PATH: &str = "/pls/soalu/est_aute.intraalucomp";
pub const BOOKING_PAGE_PATH: &str = "/pls/soalu/sic_depreservas.Reservar";
pub const ACTION_PATH: &str = "/pls/soalu/sic_depreservas.solicita_reservar";
pub const MY_BOOKINGS_PATH: &str = "/pls/soalu/sic_depreservas.mis_reservas";

/// Page served after a successful login
pub const LOGIN_OK_PAGE: &str = r#"<html><body>
<div id="menu"><a href="/pls/soalu/sic_depreservas.Reservar?p_res_tipo=PDEL">Reservas deportivas</a></div>
<div id="col_horarios"></div>
</body></html>"#;

/// Login form shown again after bad credentials
pub const LOGIN_FAILED_PAGE: &str = r#"<html><body>
<form action="est_aute.intraalucomp"><p>Usuario o clave incorrectos</p></form>
</body></html>"#;

pub const BOOKED_PAGE: &str = "<html><body><p>Reserva realizada correctamente</p></body></html>";
pub const TAKEN_PAGE: &str = "<html><body><p>Pista ocupada</p></body></html>";

/// Configuration pointing at a mock intranet, with no pause between attempts
pub fn test_config(base_url: &str, max_attempts: u32) -> Config {
    let mut config = Config::default();
    config.site.base_url = base_url.to_string();
    config.site.request_timeout_secs = 5;
    config.booking.max_attempts = max_attempts;
    config.booking.attempt_delay_secs = 0;
    config
}

pub fn test_credentials() -> Credentials {
    Credentials::new("ana", "12345678Z", "s3cret")
}

pub fn credential_provider() -> StaticCredentialProvider {
    StaticCredentialProvider::new(test_credentials())
}

/// Booking page with one free cell per court at `time` (`HH:MM`)
pub fn booking_page(courts: &[u32], time: &str) -> String {
    let cells: String = courts
        .iter()
        .map(|court| {
            format!(
                r#"<td class="libre"><a href="{ACTION_PATH}?p_pista={court}&amp;p_res_tipo=PDEL&amp;p_res_horaini={time}:00">Pista {court}</a></td>"#
            )
        })
        .collect();

    format!(
        r#"<html><head><title>Reservas</title></head><body>
<table class="horario">
<tr><th>Hora</th><th>Pistas</th></tr>
<tr><td>{time}</td>{cells}<td class="ocupada">Ocupada</td></tr>
</table>
</body></html>"#
    )
}

/// Mount the login endpoint answering with `body`
pub async fn mount_login(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}
