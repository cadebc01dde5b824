//! HTML body of the access-code email.

pub const SUBJECT: &str = "🔑 Your YC Startup Village Access Code";

/// Render the recovery email for `code`, linking to `{app_url}/login`.
pub fn access_code_html(code: &str, app_url: &str) -> String {
    let login_url = format!("{}/login", app_url.trim_end_matches('/'));
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Your YC Startup Village Access Code</title>
  <style>
    body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
    .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
    .header {{ background: #ea580c; color: white; padding: 30px; text-align: center; border-radius: 8px 8px 0 0; }}
    .content {{ background: #fff; padding: 30px; border: 1px solid #e5e7eb; }}
    .code-box {{ background: #fef3c7; border: 2px solid #f59e0b; padding: 20px; margin: 20px 0; text-align: center; border-radius: 8px; }}
    .code {{ font-family: 'Courier New', monospace; font-size: 24px; font-weight: bold; color: #92400e; letter-spacing: 2px; }}
    .warning {{ background: #fef2f2; border: 1px solid #fecaca; padding: 15px; margin: 20px 0; border-radius: 6px; color: #991b1b; }}
    .footer {{ background: #f9fafb; padding: 20px; text-align: center; font-size: 12px; color: #6b7280; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>YC Startup Village</h1>
      <p>Your Access Code Recovery</p>
    </div>
    <div class="content">
      <p>You requested to recover your access code for YC Startup Village. Here it is:</p>
      <div class="code-box">
        <p style="margin: 0; font-size: 16px; color: #92400e;">Your Access Code:</p>
        <div class="code">{code}</div>
      </div>
      <h3>How to use your code</h3>
      <ol>
        <li>Go to <a href="{login_url}" style="color: #f97316;">YC Startup Village Login</a></li>
        <li>Enter this access code in the login form</li>
        <li>Click "Access Platform" to continue</li>
      </ol>
      <div class="warning">
        <strong>Security notice:</strong> Keep this code private. Anyone with this code can access your YC Startup Village account.
      </div>
      <p>If you didn't request this code recovery, you can safely ignore this email.</p>
      <p style="margin-top: 30px;">Happy connecting!<br><strong>The YC Startup Village Community</strong></p>
    </div>
    <div class="footer">
      <p>YC Startup Village is a community project created by fellow attendees. It is not affiliated with Y Combinator.</p>
    </div>
  </div>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_contains_code_and_login_link() {
        let html = access_code_html("YC25-K7PQ2M", "https://village.example/");
        assert!(html.contains(r#"<div class="code">YC25-K7PQ2M</div>"#));
        assert!(html.contains(r#"href="https://village.example/login""#));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
