/// Wraps a typed XML-RPC value, e.g. `<int>1</int>`, in a `<methodResponse>`.
pub fn xmlrpc_value(value: &str) -> String {
    return format!(
        r#"<?xml version="1.0"?>
<methodResponse>
  <params>
    <param>
      <value>{value}</value>
    </param>
  </params>
</methodResponse>"#
    );
}

pub fn xmlrpc_fault(code: i64, message: &str) -> String {
    return format!(
        r#"<?xml version="1.0"?>
<methodResponse>
  <fault>
    <value>
      <struct>
        <member><name>faultCode</name><value><int>{code}</int></value></member>
        <member><name>faultString</name><value><string>{message}</string></value></member>
      </struct>
    </value>
  </fault>
</methodResponse>"#
    );
}

/// A job record as `boa.submit`, `boa.job` and `boa.range` return it.
pub fn job_struct(id: i64, compiler_status: &str, hadoop_status: &str) -> String {
    return format!(
        r#"<struct>
  <member><name>id</name><value><string>{id}</string></value></member>
  <member><name>submitted</name><value><string>2026-10-19 10:00:00</string></value></member>
  <member><name>input</name><value><struct>
    <member><name>id</name><value><int>3</int></value></member>
    <member><name>name</name><value><string>2022 Jan/Java</string></value></member>
  </struct></value></member>
  <member><name>compiler_status</name><value><string>{compiler_status}</string></value></member>
  <member><name>hadoop_status</name><value><string>{hadoop_status}</string></value></member>
</struct>"#
    );
}

pub fn login_struct(session_name: &str, session_id: &str, token: &str) -> String {
    return format!(
        r#"<struct>
  <member><name>sessid</name><value><string>{session_id}</string></value></member>
  <member><name>session_name</name><value><string>{session_name}</string></value></member>
  <member><name>token</name><value><string>{token}</string></value></member>
  <member><name>user</name><value><struct>
    <member><name>uid</name><value><string>7</string></value></member>
    <member><name>name</name><value><string>alice</string></value></member>
  </struct></value></member>
</struct>"#
    );
}

pub fn query_fixture() -> &'static str {
    return r#"
p: Project = input;
counts: output sum of int;

foreach (i: int; def(p.programming_languages[i]))
    counts << 1;
"#
    .trim();
}
