//! Embedded style rules for composed documents.
//!
//! Header and footer stay fixed while the body scrolls or paginates; the body keeps
//! `padding-bottom` clear of the footer band so content is never printed underneath it.

pub const DOCUMENT_STYLES: &str = r#"
body {
  font-family: 'Tiro Bangla', serif;
  margin: 0;
  color: #333;
  min-height: 100vh;
  position: relative;
  padding: 0 40px 120px;
}
.header {
  position: sticky;
  top: 0;
  background: white;
  display: flex;
  justify-content: space-between;
  align-items: flex-start;
  border-bottom: 2px solid #1a237e;
  margin: 0 -40px;
  padding: 20px 40px;
  z-index: 10;
}
.doctor-info-bn { text-align: left; }
.doctor-info-en { text-align: right; }
.doctor-name-bn {
  font-family: 'Alkatra', cursive;
  font-size: 28px;
  color: #1a237e;
  margin: 0;
}
.doctor-name-en {
  font-family: 'Alkatra', cursive;
  font-size: 24px;
  color: #1a237e;
  margin: 0;
}
.degrees, .reg-no {
  color: #455a64;
  margin: 5px 0;
}
.patient-info {
  margin: 0;
  display: flex;
  flex-wrap: wrap;
  gap: 10px;
  position: relative;
  padding: 20px 0;
  border-bottom: 2px solid #1a237e;
}
.patient-info p {
  margin: 0;
  white-space: nowrap;
}
.date {
  position: absolute;
  right: 0;
  top: 20px;
}
.medical-info {
  display: flex;
  gap: 40px;
  position: relative;
  margin: 0 -40px;
  padding: 20px 40px;
  min-height: calc(100vh - 400px);
}
.left-section {
  flex: 1;
  padding-right: 40px;
}
.vertical-divider {
  position: absolute;
  left: calc(33.33% - 1px);
  top: 0;
  bottom: 0;
  width: 1px;
  background-color: #ccd7f5;
}
.right-section { flex: 2; }
.section-title {
  font-family: 'Great Vibes', cursive;
  color: #1a237e;
  font-weight: bold;
  margin-bottom: 10px;
  font-size: 32px;
}
.examination {
  margin-top: 20px;
}
.examination-title {
  color: #1a237e;
  font-weight: bold;
  margin-bottom: 10px;
  font-size: 18px;
}
.examination-grid {
  display: grid;
  grid-template-columns: repeat(2, 1fr);
  gap: 10px;
  margin: 15px 0;
}
.examination-item { margin: 5px 0; }
.info-label {
  font-weight: bold;
  margin-right: 5px;
}
.info-value { margin-left: 8px; }
.footer {
  position: fixed;
  bottom: 0;
  left: 0;
  right: 0;
  padding: 20px 40px;
  text-align: center;
  border-top: 2px solid #1a237e;
  background: white;
}
.signature {
  position: fixed;
  bottom: 140px;
  right: 40px;
  text-align: center;
}
.signature-line {
  width: 200px;
  border-top: 1px solid #1a237e;
  margin-bottom: 5px;
}
"#;
