//! ==============================================================================
//! dashboard.rs - polling web dashboard
//! ==============================================================================
//!
//! purpose:
//!     renders the single-page dashboard served at GET /dashboard.
//!     the page polls `<api_url>/api/devices`, shows the readings newest
//!     first, and has a refresh button that is disabled while a fetch is in
//!     flight. a failed fetch shows a blocking alert.
//!
//! relationships:
//!     - used by: api.rs (rendered once at startup, held in AppState)
//!     - reads: DashboardConfig (api_url, refresh_seconds)
//!
//! ==============================================================================

use crate::config::DashboardConfig;

const TEMPLATE: &str = r##"<!doctype html>
<html>
<head>
    <meta charset="utf-8">
    <title>Smart Farming Dashboard</title>
    <style>
        body { font-family: Arial, sans-serif; padding: 20px; }
        table { width: 100%; margin-top: 10px; border-collapse: collapse; }
        th { border-bottom: 1px solid #ddd; text-align: left; }
        td { padding: 8px; }
    </style>
</head>
<body data-api-url="__API_URL__" data-refresh-ms="__REFRESH_MS__">
    <h1>Smart Farming Dashboard</h1>
    <button id="refresh">Refresh</button>
    <table>
        <thead>
            <tr>
                <th>Time</th>
                <th>Device</th>
                <th>Soil (%)</th>
                <th>Humidity (%)</th>
                <th>Temperature (°C)</th>
            </tr>
        </thead>
        <tbody id="rows"></tbody>
    </table>
    <script>
        const apiUrl = document.body.dataset.apiUrl.replace(/\/+$/, '');
        const refreshMs = Number(document.body.dataset.refreshMs) || 5000;
        const button = document.getElementById('refresh');
        const rows = document.getElementById('rows');

        function cell(text) {
            const td = document.createElement('td');
            td.textContent = text;
            return td;
        }

        function orDash(value) {
            return value === undefined || value === null ? '-' : value;
        }

        function render(readings) {
            rows.replaceChildren(...readings.map((r) => {
                const tr = document.createElement('tr');
                tr.append(
                    cell(new Date(r.timestamp).toLocaleString()),
                    cell(r.deviceId || 'unknown'),
                    cell(orDash(r.soilMoisture)),
                    cell(orDash(r.humidity)),
                    cell(orDash(r.temperature)),
                );
                return tr;
            }));
        }

        async function fetchReadings() {
            button.disabled = true;
            try {
                const res = await fetch(`${apiUrl}/api/devices`);
                if (!res.ok) throw new Error(`HTTP ${res.status}`);
                const body = await res.json();
                render((body.data || []).slice().reverse());
            } catch (err) {
                console.error(err);
                alert('Failed to load data');
            } finally {
                button.disabled = false;
            }
        }

        button.addEventListener('click', fetchReadings);
        fetchReadings();
        const timer = setInterval(fetchReadings, refreshMs);
        window.addEventListener('pagehide', () => clearInterval(timer));
    </script>
</body>
</html>
"##;

/// render the dashboard page for `config`
/// longest poll interval a browser timer can hold (2^31 - 1 ms)
const MAX_REFRESH_SECONDS: u64 = i32::MAX as u64 / 1000;

pub fn render(config: &DashboardConfig) -> String {
    let refresh_ms = config.refresh_seconds.clamp(1, MAX_REFRESH_SECONDS) * 1000;
    TEMPLATE
        .replace("__API_URL__", &html_escape(&config.api_url))
        .replace("__REFRESH_MS__", &refresh_ms.to_string())
}

/// escape html special characters to prevent xss
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_injects_api_url_and_interval() {
        let html = render(&DashboardConfig {
            api_url: "http://farm.local:3001".to_string(),
            refresh_seconds: 5,
        });

        assert!(html.contains(r#"data-api-url="http://farm.local:3001""#));
        assert!(html.contains(r#"data-refresh-ms="5000""#));
        assert!(!html.contains("__API_URL__"));
    }

    #[test]
    fn test_render_escapes_api_url() {
        let html = render(&DashboardConfig {
            api_url: r#"http://x"><script>alert(1)</script>"#.to_string(),
            refresh_seconds: 5,
        });

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn test_zero_refresh_is_clamped() {
        let html = render(&DashboardConfig {
            api_url: String::new(),
            refresh_seconds: 0,
        });
        assert!(html.contains(r#"data-refresh-ms="1000""#));
    }

    #[test]
    fn test_huge_refresh_is_capped() {
        let html = render(&DashboardConfig {
            api_url: String::new(),
            refresh_seconds: u64::MAX,
        });
        assert!(html.contains(r#"data-refresh-ms="2147483000""#));
    }
}
