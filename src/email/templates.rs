pub const SIGNUP_SUBJECT: &str = "Hanyang ERICA Data Portal - Email verification for sign-up";
pub const TEMPORARY_PASSWORD_SUBJECT: &str = "Hanyang ERICA Data Portal - Temporary password";

pub fn render_signup_code(code: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Hanyang ERICA Data Portal</h2>
    <p>Thank you for signing up to the Hanyang ERICA Data Portal!
    Enter the verification code below to finish creating your account.</p>
    <br><br>
    <p style="font-size: 24px; letter-spacing: 4px;">Verification code <strong>{code}</strong></p>
    <p style="color: #666; font-size: 14px;">If you didn't request this, you can ignore it.</p>
</body>
</html>"#
    )
}

pub fn render_temporary_password(password: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Hanyang ERICA Data Portal</h2>
    <p>Here is your temporary password for the Hanyang ERICA Data Portal.
    Use it to log in, then change it from your account settings.</p>
    <br><br>
    <p style="font-size: 20px;">Temporary password <strong>{password}</strong></p>
</body>
</html>"#
    )
}
